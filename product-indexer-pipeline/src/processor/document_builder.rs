//! Document builder implementation.
//!
//! Maps a catalog product plus the run's aggregates into a flat
//! `SearchDocument`.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::aggregator::Aggregates;
use product_indexer_shared::{PopularityMap, PriceMap, Product, SearchDocument};

/// Titles that mark a catalog entry as legacy, compared after trimming and
/// lowercasing.
pub const LEGACY_TITLES: [&str; 3] = ["legacy sku", "unknown item", "discontinued product"];

/// Trim and lowercase a unit of measure; anything but a string becomes `None`.
pub fn normalize_unit_of_measure(value: &Value) -> Option<String> {
    value.as_str().map(|uom| uom.trim().to_lowercase())
}

/// Whether a title is one of the legacy sentinel titles.
pub fn is_legacy_title(title: &Value) -> bool {
    match title.as_str() {
        Some(title) => {
            let title = title.trim().to_lowercase();
            LEGACY_TITLES.contains(&title.as_str())
        }
        None => false,
    }
}

/// Null, `false`, zero and empty strings, arrays or objects.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Build the search document for one product.
///
/// Pure: the same inputs always produce the same document.
pub fn build_document(
    product: &Product,
    popularity: &PopularityMap,
    prices: &PriceMap,
) -> SearchDocument {
    let product_id = product.product_id();
    let key = product_id.as_deref();

    let attributes = if is_empty_value(&product.attributes) {
        Value::Object(Map::new())
    } else {
        product.attributes.clone()
    };

    SearchDocument {
        sku: product.sku.clone(),
        vendor: product.vendor.clone(),
        title: product.title.clone(),
        description: product.description.clone(),
        category: product.category.clone(),
        unit_of_measure: normalize_unit_of_measure(&product.unit_of_measure),
        region_availability: product.region_availability.clone(),
        supplier_rating: product.supplier_rating.clone(),
        inventory_status: product.inventory_status.clone(),
        bulk_pack_size: product.bulk_pack_size.clone(),
        price_per_unit: key.and_then(|id| prices.get(id)).copied(),
        popularity: key.and_then(|id| popularity.get(id)).copied().unwrap_or(0),
        is_legacy: is_legacy_title(&product.title),
        attributes,
        product_id,
    }
}

/// Processor that turns the catalog into search documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentBuilder;

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        Self
    }

    /// Build one document per product, in catalog order.
    ///
    /// Products without an identifier still produce a document; the
    /// publisher drops those.
    #[instrument(skip(self, products, aggregates), fields(product_count = products.len()))]
    pub fn build_documents(
        &self,
        products: &[Product],
        aggregates: &Aggregates,
    ) -> Vec<SearchDocument> {
        let documents: Vec<SearchDocument> = products
            .iter()
            .map(|product| {
                build_document(product, &aggregates.popularity, &aggregates.price_per_unit)
            })
            .collect();

        let legacy = documents.iter().filter(|doc| doc.is_legacy).count();
        debug!(
            document_count = documents.len(),
            legacy_count = legacy,
            "Built search documents"
        );

        documents
    }
}
