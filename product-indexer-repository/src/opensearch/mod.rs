//! OpenSearch implementation of the index provider.
//!
//! This module provides a concrete implementation of `ProductIndexProvider`
//! using OpenSearch as the backend.

mod client;
mod index_config;

pub use client::OpenSearchClient;
pub use index_config::{get_index_settings, IndexConfig, DEFAULT_CHUNK_SIZE};
