//! Aggregator module for the product indexer pipeline.
//!
//! Derives per-product popularity and price-per-unit from order history.

mod order_aggregator;
mod outcome;

pub use order_aggregator::{aggregate, Aggregates, OrderAggregator, PriceWeighting};
pub use outcome::{AggregationStats, LineItemOutcome, SkipReason};
