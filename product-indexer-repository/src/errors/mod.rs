//! Error types for the product indexer repository.

mod search_index_error;

pub use search_index_error::SearchIndexError;
