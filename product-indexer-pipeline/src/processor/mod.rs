//! Processor module for the product indexer pipeline.
//!
//! Transforms catalog products into search documents.

mod document_builder;

pub use document_builder::{
    build_document, is_legacy_title, normalize_unit_of_measure, DocumentBuilder, LEGACY_TITLES,
};
