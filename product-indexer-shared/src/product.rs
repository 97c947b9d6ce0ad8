//! Catalog product records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;

/// A catalog product as exported from the product store.
///
/// Descriptive fields are carried as raw JSON and passed through to the
/// search document unchanged. A missing `region_availability` reads as an
/// empty list; an explicit `null` is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", default)]
    pub id: Option<Value>,
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
    #[serde(default)]
    pub unit_of_measure: Value,
    #[serde(default = "empty_list")]
    pub region_availability: Value,
    #[serde(default)]
    pub supplier_rating: Value,
    #[serde(default)]
    pub inventory_status: Value,
    #[serde(default)]
    pub bulk_pack_size: Value,
    #[serde(default)]
    pub attributes: Value,
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            sku: Value::Null,
            vendor: Value::Null,
            title: Value::Null,
            description: Value::Null,
            category: Value::Null,
            unit_of_measure: Value::Null,
            region_availability: empty_list(),
            supplier_rating: Value::Null,
            inventory_status: Value::Null,
            bulk_pack_size: Value::Null,
            attributes: Value::Null,
        }
    }
}

impl Product {
    /// Create a product with the given identifier and no other fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(Value::String(id.into())),
            ..Default::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Value::String(title.into());
        self
    }

    /// Set the unit of measure.
    pub fn with_unit_of_measure(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = Value::String(unit.into());
        self
    }

    /// The product identifier, or `None` when missing or empty.
    pub fn product_id(&self) -> Option<String> {
        coerce::identifier(self.id.as_ref())
    }
}
