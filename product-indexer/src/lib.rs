//! # Product Indexer
//!
//! Main library for the product indexer batch job.
//!
//! This crate provides the configuration, input loading and dependency
//! wiring for running the product indexing pipeline.

pub mod config;
pub mod input;

pub use config::{Dependencies, Settings};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An input file could not be read or parsed.
    #[error("Failed to load {}: {message}", .path.display())]
    InputError { path: PathBuf, message: String },

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] product_indexer_pipeline::PipelineError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] product_indexer_repository::SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an input error for the given file.
    pub fn input(path: &Path, msg: impl ToString) -> Self {
        Self::InputError {
            path: path.to_path_buf(),
            message: msg.to_string(),
        }
    }
}
