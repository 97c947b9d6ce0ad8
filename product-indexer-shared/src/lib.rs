//! # Product Indexer Shared
//!
//! Shared types for the product indexer: the order and product records read
//! from the input files, the per-product aggregate maps, and the flat search
//! document published to the index.

use std::collections::HashMap;

mod coerce;
mod order;
mod product;
mod search_document;

pub use order::{Cart, LineItem, Order};
pub use product::Product;
pub use search_document::SearchDocument;

/// Product identifier → total ordered quantity.
pub type PopularityMap = HashMap<String, u64>;

/// Product identifier → weighted average price-per-unit.
pub type PriceMap = HashMap<String, f64>;
