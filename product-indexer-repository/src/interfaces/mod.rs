//! Interface definitions for the indexing collaborator.
//!
//! This module defines the abstract `ProductIndexProvider` trait that allows
//! for dependency injection and swappable index backends.

mod product_index_provider;

pub use product_index_provider::ProductIndexProvider;
