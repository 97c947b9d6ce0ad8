//! Publisher module for the product indexer pipeline.
//!
//! Publishes built documents into the search index.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::PipelineError;
use product_indexer_repository::{ProductIndexProvider, UpsertOperation};
use product_indexer_shared::SearchDocument;

/// Default target index.
pub const DEFAULT_INDEX_NAME: &str = "products_v1";

/// Default timeout for the bulk request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for the product publisher.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Name of the index documents are written to.
    pub index_name: String,
    /// Timeout for the bulk request; large catalogs take a while to index.
    pub request_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Publisher that upserts documents into the search index.
///
/// The publisher is responsible for:
/// - Dropping documents without a usable product identifier
/// - Keying each document by product identifier so republishing overwrites
/// - Submitting the whole set as one bulk call
///
/// It never retries; a failed batch is returned to the caller.
pub struct ProductPublisher {
    provider: Arc<dyn ProductIndexProvider>,
    config: PublisherConfig,
}

impl ProductPublisher {
    /// Create a new publisher with the default configuration.
    pub fn new(provider: Arc<dyn ProductIndexProvider>) -> Self {
        Self {
            provider,
            config: PublisherConfig::default(),
        }
    }

    /// Create a new publisher with custom configuration.
    pub fn with_config(provider: Arc<dyn ProductIndexProvider>, config: PublisherConfig) -> Self {
        Self { provider, config }
    }

    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    /// Turn documents into keyed upsert operations, dropping those without a key.
    pub fn upsert_operations(&self, documents: Vec<SearchDocument>) -> Vec<UpsertOperation> {
        documents
            .into_iter()
            .filter_map(|document| {
                let key = document.index_key()?.to_string();
                Some(UpsertOperation::new(&self.config.index_name, key, document))
            })
            .collect()
    }

    /// Publish a document set and return how many documents were stored.
    ///
    /// Any failure of the bulk call, or any document rejected by the index,
    /// fails the whole publish.
    #[instrument(
        skip(self, documents),
        fields(document_count = documents.len(), index = %self.config.index_name)
    )]
    pub async fn publish(&self, documents: Vec<SearchDocument>) -> Result<usize, PipelineError> {
        let document_count = documents.len();
        let operations = self.upsert_operations(documents);

        let dropped = document_count - operations.len();
        if dropped > 0 {
            warn!(dropped = dropped, "Dropped documents without a product id");
        }

        if operations.is_empty() {
            debug!("No documents to publish");
            return Ok(0);
        }

        let summary = self
            .provider
            .bulk_upsert(&operations, self.config.request_timeout)
            .await
            .map_err(|e| {
                error!(error = %e, count = operations.len(), "Bulk upsert failed");
                PipelineError::from(e)
            })?;

        if summary.failed > 0 {
            let sample: Vec<&str> = summary.failed_keys().take(5).collect();
            error!(
                failed = summary.failed,
                total = summary.total,
                sample = ?sample,
                "Index rejected documents"
            );
            return Err(PipelineError::publish(format!(
                "{} of {} documents were rejected by the index",
                summary.failed, summary.total
            )));
        }

        info!(count = summary.succeeded, "Published documents");
        Ok(summary.succeeded)
    }

    /// Ensure the target index exists.
    pub async fn ensure_index(&self) -> Result<(), PipelineError> {
        self.provider
            .ensure_index_exists(&self.config.index_name)
            .await
            .map_err(PipelineError::from)
    }

    /// Check if the search engine is healthy.
    pub async fn health_check(&self) -> Result<bool, PipelineError> {
        self.provider
            .health_check()
            .await
            .map_err(PipelineError::from)
    }
}
