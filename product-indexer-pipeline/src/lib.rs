//! # Product Indexer Pipeline
//!
//! This crate provides the batch pipeline that turns order history and the
//! product catalog into search documents and publishes them.
//!
//! ## Architecture
//!
//! The pipeline follows an Aggregate-Build-Publish pattern:
//!
//! 1. **Aggregator**: Derives popularity and price-per-unit from orders
//! 2. **Processor**: Builds one search document per product
//! 3. **Publisher**: Upserts the documents into the index in one batch
//! 4. **Orchestrator**: Runs one full recompute-and-republish pass

pub mod aggregator;
pub mod errors;
pub mod orchestrator;
pub mod processor;
pub mod publisher;

pub use aggregator::{aggregate, Aggregates, OrderAggregator, PriceWeighting};
pub use errors::PipelineError;
pub use orchestrator::{Orchestrator, RunSummary};
pub use processor::{build_document, DocumentBuilder};
pub use publisher::{ProductPublisher, PublisherConfig};
