//! Product index provider trait definition.
//!
//! This module defines the abstract interface for the indexing collaborator,
//! allowing for different backend implementations (OpenSearch, in-memory, etc.).

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationSummary, UpsertOperation};

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into the publisher so that the pipeline can
/// run against OpenSearch in production and against an in-memory index in
/// tests.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error
/// handling across backends.
#[async_trait]
pub trait ProductIndexProvider: Send + Sync {
    /// Insert or overwrite every document in `operations` in one bulk call.
    ///
    /// Each operation names its index and key; a document stored under an
    /// existing key replaces it.
    ///
    /// # Arguments
    ///
    /// * `operations` - The `(index, key, document)` triples to store
    /// * `timeout` - Request timeout applied to the bulk call
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-item outcome of the batch
    /// * `Err(SearchIndexError)` - If the bulk call fails as a whole
    async fn bulk_upsert(
        &self,
        operations: &[UpsertOperation],
        timeout: Duration,
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Ensure the named index exists, creating it with product mappings if needed.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index exists or was created successfully
    /// * `Err(SearchIndexError)` - If index creation fails
    async fn ensure_index_exists(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
