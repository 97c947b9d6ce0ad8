//! In-memory index provider.
//!
//! This module provides [`InMemoryIndex`], a `HashMap`-backed provider
//! protected by a `tokio::sync::RwLock`. It is used by tests and for local
//! dry runs that should not touch a real cluster.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::SearchIndexError;
use crate::interfaces::ProductIndexProvider;
use crate::types::{BatchOperationResult, BatchOperationSummary, UpsertOperation};
use product_indexer_shared::SearchDocument;

/// An in-memory index with put-by-key semantics.
///
/// Indices are stored as nested maps: index name → document key → document.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    indices: RwLock<HashMap<String, HashMap<String, SearchDocument>>>,
    unavailable: Option<String>,
    rejected_keys: HashSet<String>,
}

impl InMemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index whose every call fails with a connection error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Reject the given keys at item level, as a cluster would for documents
    /// that fail mapping.
    pub fn with_rejected_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Fetch a stored document.
    pub async fn get(&self, index: &str, key: &str) -> Option<SearchDocument> {
        self.indices
            .read()
            .await
            .get(index)
            .and_then(|docs| docs.get(key))
            .cloned()
    }

    /// Number of documents stored in an index.
    pub async fn count(&self, index: &str) -> usize {
        self.indices
            .read()
            .await
            .get(index)
            .map_or(0, HashMap::len)
    }

    /// Whether the index has been created.
    pub async fn contains_index(&self, index: &str) -> bool {
        self.indices.read().await.contains_key(index)
    }

    fn check_available(&self) -> Result<(), SearchIndexError> {
        match &self.unavailable {
            Some(reason) => Err(SearchIndexError::connection(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProductIndexProvider for InMemoryIndex {
    async fn bulk_upsert(
        &self,
        operations: &[UpsertOperation],
        _timeout: Duration,
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        self.check_available()?;

        let mut indices = self.indices.write().await;
        let mut results = Vec::with_capacity(operations.len());

        for operation in operations {
            if operation.key.is_empty() {
                results.push(BatchOperationResult::failed(
                    "",
                    SearchIndexError::validation("document key is required"),
                ));
                continue;
            }
            if self.rejected_keys.contains(&operation.key) {
                results.push(BatchOperationResult::failed(
                    operation.key.clone(),
                    SearchIndexError::index("document rejected"),
                ));
                continue;
            }

            indices
                .entry(operation.index.clone())
                .or_default()
                .insert(operation.key.clone(), operation.document.clone());
            results.push(BatchOperationResult::succeeded(operation.key.clone()));
        }

        debug!(count = results.len(), "Stored documents in memory");
        Ok(BatchOperationSummary::from_results(results))
    }

    async fn ensure_index_exists(&self, index: &str) -> Result<(), SearchIndexError> {
        self.check_available()?;
        self.indices
            .write()
            .await
            .entry(index.to_string())
            .or_default();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(self.unavailable.is_none())
    }
}
