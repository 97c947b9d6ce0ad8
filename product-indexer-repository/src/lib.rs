//! # Product Indexer Repository
//!
//! This crate provides the interface for publishing product documents to a
//! search index. It includes the error type, the provider trait, an OpenSearch
//! implementation and an in-memory implementation for tests and dry runs.

pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod types;

pub use crate::errors::SearchIndexError;
pub use crate::interfaces::ProductIndexProvider;
pub use crate::memory::InMemoryIndex;
pub use crate::opensearch::{IndexConfig, OpenSearchClient};
pub use crate::types::{BatchOperationResult, BatchOperationSummary, UpsertOperation};
