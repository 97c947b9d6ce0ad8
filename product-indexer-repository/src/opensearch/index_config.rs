//! OpenSearch index configuration and mappings.
//!
//! This module defines the bulk settings and the mappings used when the
//! product index has to be created.

use serde_json::{json, Value};

/// Default number of operations sent per `_bulk` request.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Settings for the OpenSearch provider.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Maximum number of operations per `_bulk` HTTP request.
    pub chunk_size: usize,
    /// Primary shards used when creating the index.
    pub number_of_shards: u32,
    /// Replicas used when creating the index.
    pub number_of_replicas: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            number_of_shards: 1,
            number_of_replicas: 1,
        }
    }
}

impl IndexConfig {
    /// Create a config with a custom bulk chunk size.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Default::default()
        }
    }
}

/// Get the index settings and mappings for the product search index.
///
/// The configuration includes:
/// - **Keyword fields**: identifiers, facets and the normalized unit of measure
/// - **Text fields**: title (with a `raw` keyword subfield) and description
/// - **Numeric fields**: price-per-unit, popularity and supplier rating for
///   sorting and boosting
pub fn get_index_settings(config: &IndexConfig) -> Value {
    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
            "number_of_replicas": config.number_of_replicas
        },
        "mappings": {
            "properties": {
                "product_id": { "type": "keyword" },
                "sku": { "type": "keyword" },
                "vendor": { "type": "keyword" },
                "title": {
                    "type": "text",
                    "fields": {
                        "raw": { "type": "keyword" }
                    }
                },
                "description": { "type": "text" },
                "category": { "type": "keyword" },
                "unit_of_measure": { "type": "keyword" },
                "region_availability": { "type": "keyword" },
                "supplier_rating": { "type": "float" },
                "inventory_status": { "type": "keyword" },
                "bulk_pack_size": { "type": "long" },
                "price_per_unit": { "type": "double" },
                "popularity": { "type": "long" },
                "is_legacy": { "type": "boolean" },
                "attributes": { "type": "object", "dynamic": true }
            }
        }
    })
}
