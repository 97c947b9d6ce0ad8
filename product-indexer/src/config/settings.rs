//! Runtime settings for the product indexer.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::IndexingError;
use product_indexer_pipeline::PriceWeighting;
use product_indexer_repository::opensearch::DEFAULT_CHUNK_SIZE;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://127.0.0.1:9200";

/// Default target index.
const DEFAULT_INDEX_NAME: &str = "products_v1";

/// Default catalog export.
const DEFAULT_PRODUCTS_PATH: &str = "data/products.json";

/// Default order history export.
const DEFAULT_ORDERS_PATH: &str = "data/orders.json";

/// Default bulk request timeout, in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Settings for one indexer run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub opensearch_url: String,
    pub index_name: String,
    pub products_path: PathBuf,
    pub orders_path: PathBuf,
    pub request_timeout: Duration,
    /// Documents per `_bulk` request.
    pub chunk_size: usize,
    pub price_weighting: PriceWeighting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            products_path: PathBuf::from(DEFAULT_PRODUCTS_PATH),
            orders_path: PathBuf::from(DEFAULT_ORDERS_PATH),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            chunk_size: DEFAULT_CHUNK_SIZE,
            price_weighting: PriceWeighting::default(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://127.0.0.1:9200)
    /// - `PRODUCT_INDEX_NAME`: Target index (default: products_v1)
    /// - `PRODUCTS_PATH`: Catalog JSON file (default: data/products.json)
    /// - `ORDERS_PATH`: Order history JSON file (default: data/orders.json)
    /// - `BULK_REQUEST_TIMEOUT_SECS`: Bulk request timeout (default: 120)
    /// - `BULK_CHUNK_SIZE`: Documents per bulk request (default: 500)
    /// - `PRICE_WEIGHTING`: `raw` or `quantity` (default: raw)
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexingError> {
        let defaults = Self::default();

        let opensearch_url = lookup("OPENSEARCH_URL").unwrap_or(defaults.opensearch_url);
        let index_name = lookup("PRODUCT_INDEX_NAME").unwrap_or(defaults.index_name);
        if index_name.trim().is_empty() {
            return Err(IndexingError::config("PRODUCT_INDEX_NAME must not be empty"));
        }

        let products_path = lookup("PRODUCTS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.products_path);
        let orders_path = lookup("ORDERS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.orders_path);

        let request_timeout = match lookup("BULK_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("BULK_REQUEST_TIMEOUT_SECS", &raw)?),
            None => defaults.request_timeout,
        };

        let chunk_size = match lookup("BULK_CHUNK_SIZE") {
            Some(raw) => parse_number::<usize>("BULK_CHUNK_SIZE", &raw)?,
            None => defaults.chunk_size,
        };
        if chunk_size == 0 {
            return Err(IndexingError::config("BULK_CHUNK_SIZE must be greater than zero"));
        }

        let price_weighting = match lookup("PRICE_WEIGHTING") {
            Some(raw) => PriceWeighting::from_str(&raw)
                .map_err(|e| IndexingError::config(format!("PRICE_WEIGHTING: {}", e)))?,
            None => defaults.price_weighting,
        };

        Ok(Self {
            opensearch_url,
            index_name,
            products_path,
            orders_path,
            request_timeout,
            chunk_size,
            price_weighting,
        })
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, IndexingError> {
    raw.trim().parse().map_err(|_| {
        IndexingError::config(format!(
            "{} must be a non-negative integer, got '{}'",
            key, raw
        ))
    })
}
