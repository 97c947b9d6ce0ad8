//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `ProductIndexProvider`
//! using the OpenSearch Rust client.

use std::time::Duration;

use ::opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::ProductIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::types::{BatchOperationResult, BatchOperationSummary, UpsertOperation};

/// OpenSearch client implementation.
///
/// Publishes product documents through the `_bulk` API, splitting large
/// batches into requests of at most `chunk_size` operations.
///
/// # Example
///
/// ```ignore
/// use product_indexer_repository::{IndexConfig, OpenSearchClient, ProductIndexProvider};
///
/// let client = OpenSearchClient::new("http://localhost:9200", IndexConfig::default()).await?;
/// client.ensure_index_exists("products_v1").await?;
/// let summary = client.bulk_upsert(&operations, Duration::from_secs(120)).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    config: IndexConfig,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `config` - Bulk chunking and index creation settings
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub async fn new(url: &str, config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            chunk_size = config.chunk_size,
            "Created OpenSearch client"
        );

        Ok(Self { client, config })
    }

    /// Split operations into `_bulk` requests of at most `chunk_size` items.
    ///
    /// A zero chunk size sends one operation per request.
    fn request_chunks(
        operations: &[UpsertOperation],
        chunk_size: usize,
    ) -> std::slice::Chunks<'_, UpsertOperation> {
        operations.chunks(chunk_size.max(1))
    }

    /// Build the newline-delimited `_bulk` body for a chunk of operations.
    fn bulk_body(operations: &[UpsertOperation]) -> Result<Vec<JsonBody<Value>>, SearchIndexError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(operations.len() * 2);

        for operation in operations {
            body.push(json!({"index": {"_index": operation.index, "_id": operation.key}}).into());
            body.push(serde_json::to_value(&operation.document)?.into());
        }

        Ok(body)
    }

    /// Turn a `_bulk` response body into per-item results.
    ///
    /// Items are reported in request order; an item with an `error` object or
    /// a non-2xx status counts as failed.
    fn parse_bulk_response(
        body: &Value,
        operations: &[UpsertOperation],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchIndexError::serialization("Bulk response has no items"))?;

        let results = items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let action = item.as_object().and_then(|o| o.values().next());
                let key = action
                    .and_then(|a| a.get("_id"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| operations.get(position).map(|op| op.key.clone()))
                    .unwrap_or_default();

                let Some(action) = action else {
                    return BatchOperationResult::failed(
                        key,
                        SearchIndexError::serialization("Malformed bulk response item"),
                    );
                };

                if let Some(err) = action.get("error").filter(|e| !e.is_null()) {
                    let kind = err.get("type").and_then(Value::as_str).unwrap_or("unknown");
                    let reason = err.get("reason").and_then(Value::as_str).unwrap_or_default();
                    return BatchOperationResult::failed(
                        key,
                        SearchIndexError::index(format!("{}: {}", kind, reason)),
                    );
                }

                match action.get("status").and_then(Value::as_u64) {
                    Some(status) if !(200..300).contains(&status) => BatchOperationResult::failed(
                        key,
                        SearchIndexError::index(format!("Item rejected with status {}", status)),
                    ),
                    _ => BatchOperationResult::succeeded(key),
                }
            })
            .collect();

        Ok(BatchOperationSummary::from_results(results))
    }

    /// Send one `_bulk` request for a chunk of operations.
    async fn send_chunk(
        &self,
        operations: &[UpsertOperation],
        timeout: Duration,
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let body = Self::bulk_body(operations)?;

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .request_timeout(timeout)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_operation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_operation(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        Self::parse_bulk_response(&response_body, operations)
    }
}

#[async_trait]
impl ProductIndexProvider for OpenSearchClient {
    /// Store every operation through the `_bulk` API.
    ///
    /// Operations are sent in chunks of `chunk_size`; a transport or HTTP
    /// failure on any chunk aborts the whole call. Item-level rejections are
    /// reported in the summary.
    #[instrument(skip(self, operations), fields(operation_count = operations.len()))]
    async fn bulk_upsert(
        &self,
        operations: &[UpsertOperation],
        timeout: Duration,
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        let mut summary = BatchOperationSummary::default();

        let chunks = Self::request_chunks(operations, self.config.chunk_size);
        for (chunk_number, chunk) in chunks.enumerate() {
            debug!(chunk = chunk_number, size = chunk.len(), "Sending bulk chunk");
            summary.merge(self.send_chunk(chunk, timeout).await?);
        }

        if summary.failed > 0 {
            warn!(
                failed = summary.failed,
                total = summary.total,
                "Bulk upsert had rejected items"
            );
        }

        Ok(summary)
    }

    async fn ensure_index_exists(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await?;

        if response.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(get_index_settings(&self.config))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another run may have created the index in the meantime.
            if error_body.contains("resource_already_exists_exception") {
                return Ok(());
            }
            error!(status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index, "Created index");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Ok(false);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let status = body.get("status").and_then(Value::as_str).unwrap_or("red");
        debug!(status = %status, "Cluster health");
        Ok(matches!(status, "green" | "yellow"))
    }
}
