//! The document published to the product search index.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Denormalized, flat search document for one product.
///
/// Every field is always serialized; absent values are written as `null`,
/// and `popularity` is 0 when the product was never ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub product_id: Option<String>,
    #[serde(default)]
    pub sku: Value,
    #[serde(default)]
    pub vendor: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub category: Value,
    pub unit_of_measure: Option<String>,
    #[serde(default)]
    pub region_availability: Value,
    #[serde(default)]
    pub supplier_rating: Value,
    #[serde(default)]
    pub inventory_status: Value,
    #[serde(default)]
    pub bulk_pack_size: Value,
    pub price_per_unit: Option<f64>,
    pub popularity: u64,
    pub is_legacy: bool,
    #[serde(default)]
    pub attributes: Value,
}

impl SearchDocument {
    /// The key this document is stored under, if it has a usable identifier.
    pub fn index_key(&self) -> Option<&str> {
        self.product_id.as_deref().filter(|id| !id.is_empty())
    }
}
