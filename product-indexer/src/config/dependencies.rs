//! Dependency initialization and wiring for the product indexer.

use std::sync::Arc;
use tracing::info;

use super::Settings;
use crate::IndexingError;
use product_indexer_pipeline::{
    DocumentBuilder, OrderAggregator, Orchestrator, ProductPublisher, PublisherConfig,
};
use product_indexer_repository::{IndexConfig, OpenSearchClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from the given settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the URL is invalid, or OpenSearch cannot be
    ///   reached or is unhealthy
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            index = %settings.index_name,
            chunk_size = settings.chunk_size,
            price_weighting = ?settings.price_weighting,
            "Initializing dependencies"
        );

        let search_client = OpenSearchClient::new(
            &settings.opensearch_url,
            IndexConfig::with_chunk_size(settings.chunk_size),
        )
        .await?;

        let publisher = ProductPublisher::with_config(
            Arc::new(search_client),
            PublisherConfig {
                index_name: settings.index_name.clone(),
                request_timeout: settings.request_timeout,
            },
        );

        if !publisher.health_check().await? {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let orchestrator = Orchestrator::new(
            OrderAggregator::with_weighting(settings.price_weighting),
            DocumentBuilder::new(),
            publisher,
        );

        Ok(Self { orchestrator })
    }
}
