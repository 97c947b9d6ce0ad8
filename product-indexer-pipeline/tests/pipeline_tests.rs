//! End-to-end runs of the pipeline against the in-memory index.

use std::sync::Arc;

use product_indexer_pipeline::{
    DocumentBuilder, OrderAggregator, Orchestrator, PipelineError, PriceWeighting,
    ProductPublisher, PublisherConfig,
};
use product_indexer_repository::InMemoryIndex;
use product_indexer_shared::{Order, Product};
use serde_json::{json, Value};

fn products() -> Vec<Product> {
    serde_json::from_value(json!([
        {
            "_id": "P1",
            "sku": "GLV-100",
            "vendor": "Acme",
            "title": "Nitrile Gloves",
            "unit_of_measure": " BOX ",
            "region_availability": ["us-east", "us-west"],
            "supplier_rating": 4.6,
            "inventory_status": "in_stock",
            "bulk_pack_size": 10,
            "attributes": {"size": "L"}
        },
        {"_id": "P2", "title": "Legacy SKU"},
        {"title": "Orphan record without id"},
        {"_id": "", "title": "Empty id"},
        {"_id": "P3", "title": "Discontinued Product", "attributes": null}
    ]))
    .unwrap()
}

fn orders() -> Vec<Order> {
    serde_json::from_value(json!([
        {"cart": {"items": [
            {"product_id": "P1", "quantity": 2, "price": 10.0},
            {"product_id": "P1", "quantity": 3, "price": 10.0}
        ]}},
        {"cart": {"items": [
            {"product_id": "P3", "quantity": 0, "price": 5.0},
            {"product_id": null, "quantity": 7, "price": 1.0},
            {"product_id": "P9", "quantity": "4"}
        ]}},
        {"cart": {}}
    ]))
    .unwrap()
}

fn orchestrator(index: Arc<InMemoryIndex>, weighting: PriceWeighting) -> Orchestrator {
    Orchestrator::new(
        OrderAggregator::with_weighting(weighting),
        DocumentBuilder::new(),
        ProductPublisher::with_config(
            index,
            PublisherConfig {
                index_name: "products_test".to_string(),
                ..Default::default()
            },
        ),
    )
}

#[tokio::test]
async fn test_full_run_publishes_keyed_documents() {
    let index = Arc::new(InMemoryIndex::new());

    let summary = orchestrator(index.clone(), PriceWeighting::RawLinePrice)
        .run(&products(), &orders())
        .await
        .unwrap();

    assert_eq!(summary.products_processed, 5);
    assert_eq!(summary.documents_built, 5);
    assert_eq!(summary.documents_published, 3);
    assert_eq!(summary.products_skipped(), 2);
    assert_eq!(summary.aggregation.orders, 3);
    assert_eq!(summary.aggregation.line_items, 5);
    assert_eq!(summary.aggregation.skipped, 1);
    assert_eq!(index.count("products_test").await, 3);

    let p1 = index.get("products_test", "P1").await.unwrap();
    assert_eq!(p1.popularity, 5);
    assert!((p1.price_per_unit.unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(p1.unit_of_measure.as_deref(), Some("box"));
    assert!(!p1.is_legacy);

    let p2 = index.get("products_test", "P2").await.unwrap();
    assert_eq!(p2.popularity, 0);
    assert_eq!(p2.price_per_unit, None);
    assert!(p2.is_legacy);
    assert_eq!(p2.region_availability, json!([]));

    let p3 = index.get("products_test", "P3").await.unwrap();
    assert_eq!(p3.popularity, 0);
    assert_eq!(p3.price_per_unit, None);
    assert!(p3.is_legacy);
    assert_eq!(p3.attributes, json!({}));
}

#[tokio::test]
async fn test_published_document_serializes_all_fields() {
    let index = Arc::new(InMemoryIndex::new());

    orchestrator(index.clone(), PriceWeighting::RawLinePrice)
        .run(&products(), &orders())
        .await
        .unwrap();

    let p2 = serde_json::to_value(index.get("products_test", "P2").await.unwrap()).unwrap();
    assert_eq!(p2["price_per_unit"], Value::Null);
    assert_eq!(p2["popularity"], json!(0));
    assert_eq!(p2["is_legacy"], json!(true));
    assert_eq!(p2["sku"], Value::Null);
    assert_eq!(p2["unit_of_measure"], Value::Null);
}

#[tokio::test]
async fn test_quantity_weighted_run() {
    let index = Arc::new(InMemoryIndex::new());

    orchestrator(index.clone(), PriceWeighting::QuantityWeighted)
        .run(&products(), &orders())
        .await
        .unwrap();

    let p1 = index.get("products_test", "P1").await.unwrap();
    assert!((p1.price_per_unit.unwrap() - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_rerun_overwrites_without_duplicates() {
    let index = Arc::new(InMemoryIndex::new());
    let pipeline = orchestrator(index.clone(), PriceWeighting::RawLinePrice);

    pipeline.run(&products(), &orders()).await.unwrap();
    let first = index.get("products_test", "P1").await.unwrap();

    pipeline.run(&products(), &orders()).await.unwrap();
    let second = index.get("products_test", "P1").await.unwrap();

    assert_eq!(index.count("products_test").await, 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_rejected_document_fails_run() {
    let index = Arc::new(InMemoryIndex::new().with_rejected_keys(["P3"]));

    let result = orchestrator(index, PriceWeighting::RawLinePrice)
        .run(&products(), &orders())
        .await;

    assert!(matches!(result, Err(PipelineError::PublishError(_))));
}

#[tokio::test]
async fn test_malformed_orders_are_skipped_not_fatal() {
    let index = Arc::new(InMemoryIndex::new());
    let orders: Vec<Order> = serde_json::from_value(json!([
        {"cart": {"items": [null, 5, {"product_id": "P1", "quantity": 2, "price": 1.0}]}},
        {"cart": "oops"},
        {"cart": {"items": "not a list"}},
        null,
        {"cart": {"items": [{"product_id": "P1", "quantity": 1, "price": 2.0}]}}
    ]))
    .unwrap();

    let summary = orchestrator(index.clone(), PriceWeighting::RawLinePrice)
        .run(&products(), &orders)
        .await
        .unwrap();

    assert_eq!(summary.aggregation.orders, 5);
    assert_eq!(summary.aggregation.line_items, 4);
    assert_eq!(summary.aggregation.skipped, 2);
    assert_eq!(summary.aggregation.counted, 2);
    assert_eq!(summary.documents_published, 3);

    let p1 = index.get("products_test", "P1").await.unwrap();
    assert_eq!(p1.popularity, 3);
    assert!((p1.price_per_unit.unwrap() - 1.0).abs() < 1e-9);
}
