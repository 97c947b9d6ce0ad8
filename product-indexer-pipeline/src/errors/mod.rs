//! Error types for the product indexer pipeline.

use product_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur in the product indexer pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The index accepted the request but rejected documents, or the batch
    /// could not be submitted.
    #[error("Publish error: {0}")]
    PublishError(String),

    /// Error from the search index.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),

    /// A pipeline setting could not be interpreted.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Create a publish error.
    pub fn publish(msg: impl Into<String>) -> Self {
        Self::PublishError(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
