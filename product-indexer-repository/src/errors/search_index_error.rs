//! Search index error types.
//!
//! This module defines the error types that can occur while talking to the
//! search index.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., an operation without a key).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A single document was rejected by the index.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Failed to create the target index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// The bulk request failed as a whole.
    #[error("Bulk operation error: {0}")]
    BulkOperationError(String),

    /// Failed to serialize a document or parse a response body.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a bulk operation error.
    pub fn bulk_operation(msg: impl Into<String>) -> Self {
        Self::BulkOperationError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

impl From<serde_json::Error> for SearchIndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<::opensearch::Error> for SearchIndexError {
    fn from(err: ::opensearch::Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}
