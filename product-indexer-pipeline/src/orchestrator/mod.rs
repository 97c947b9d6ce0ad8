//! Orchestrator module for the product indexer pipeline.
//!
//! Coordinates the aggregator, document builder and publisher for one run.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::aggregator::{AggregationStats, OrderAggregator};
use crate::errors::PipelineError;
use crate::processor::DocumentBuilder;
use crate::publisher::ProductPublisher;
use product_indexer_shared::{Order, Product};

/// Outcome of one recompute-and-republish run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Products read from the catalog.
    pub products_processed: usize,
    /// Documents built (one per product).
    pub documents_built: usize,
    /// Documents stored in the index.
    pub documents_published: usize,
    /// Audit counts from aggregation.
    pub aggregation: AggregationStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Products that were not published because they had no identifier.
    pub fn products_skipped(&self) -> usize {
        self.documents_built.saturating_sub(self.documents_published)
    }
}

/// Orchestrator that runs the pipeline as a single batch.
///
/// Each run:
/// - Ensures the target index exists
/// - Aggregates the full order history
/// - Builds a document for every product
/// - Publishes the documents in one bulk call
///
/// Nothing is carried over between runs.
pub struct Orchestrator {
    aggregator: OrderAggregator,
    builder: DocumentBuilder,
    publisher: ProductPublisher,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        aggregator: OrderAggregator,
        builder: DocumentBuilder,
        publisher: ProductPublisher,
    ) -> Self {
        Self {
            aggregator,
            builder,
            publisher,
        }
    }

    /// Run one full batch over the given snapshot of products and orders.
    #[instrument(skip_all, fields(products = products.len(), orders = orders.len()))]
    pub async fn run(
        &self,
        products: &[Product],
        orders: &[Order],
    ) -> Result<RunSummary, PipelineError> {
        let started_at = Utc::now();
        info!(index = %self.publisher.index_name(), "Starting product index run");

        self.publisher.ensure_index().await?;

        let aggregates = self.aggregator.aggregate(orders);
        let documents = self.builder.build_documents(products, &aggregates);
        let documents_built = documents.len();

        let documents_published = self.publisher.publish(documents).await?;

        let summary = RunSummary {
            products_processed: products.len(),
            documents_built,
            documents_published,
            aggregation: aggregates.stats,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            products = summary.products_processed,
            published = summary.documents_published,
            skipped = summary.products_skipped(),
            elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds(),
            "Product index run complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_indexer_repository::InMemoryIndex;
    use product_indexer_shared::LineItem;
    use std::sync::Arc;

    fn orchestrator(index: Arc<InMemoryIndex>) -> Orchestrator {
        Orchestrator::new(
            OrderAggregator::new(),
            DocumentBuilder::new(),
            ProductPublisher::new(index),
        )
    }

    #[tokio::test]
    async fn test_run_creates_index_and_publishes() {
        let index = Arc::new(InMemoryIndex::new());
        let products = vec![Product::new("P1"), Product::new("P2").with_title("Legacy SKU")];
        let orders = vec![Order::new(vec![LineItem::new("P1", 3, Some(9.0))])];

        let summary = orchestrator(index.clone()).run(&products, &orders).await.unwrap();

        assert_eq!(summary.products_processed, 2);
        assert_eq!(summary.documents_published, 2);
        assert_eq!(summary.products_skipped(), 0);
        assert_eq!(summary.aggregation.line_items, 1);
        assert!(summary.finished_at >= summary.started_at);

        let p1 = index.get("products_v1", "P1").await.unwrap();
        assert_eq!(p1.popularity, 3);
        assert_eq!(p1.price_per_unit, Some(3.0));
        assert!(index.get("products_v1", "P2").await.unwrap().is_legacy);
    }

    #[tokio::test]
    async fn test_run_with_empty_inputs() {
        let index = Arc::new(InMemoryIndex::new());

        let summary = orchestrator(index.clone()).run(&[], &[]).await.unwrap();

        assert_eq!(summary.products_processed, 0);
        assert_eq!(summary.documents_published, 0);
        assert!(index.contains_index("products_v1").await);
    }

    #[tokio::test]
    async fn test_run_fails_when_index_unavailable() {
        let index = Arc::new(InMemoryIndex::unavailable("connection refused"));

        let result = orchestrator(index).run(&[Product::new("P1")], &[]).await;

        assert!(result.is_err());
    }
}
