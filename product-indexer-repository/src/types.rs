//! Request and response types for index operations.

use crate::errors::SearchIndexError;
use product_indexer_shared::SearchDocument;

/// One keyed put against the index.
///
/// Storing a document under a key that already exists overwrites it, so
/// submitting the same operation twice leaves a single entry behind.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOperation {
    /// Name of the target index.
    pub index: String,
    /// Document key inside the index.
    pub key: String,
    /// Document body.
    pub document: SearchDocument,
}

impl UpsertOperation {
    pub fn new(index: impl Into<String>, key: impl Into<String>, document: SearchDocument) -> Self {
        Self {
            index: index.into(),
            key: key.into(),
            document,
        }
    }
}

/// Result of a batch operation for a single item.
///
/// Indicates whether the index accepted the document and carries the error
/// reported for it otherwise.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The document key.
    pub key: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

impl BatchOperationResult {
    pub fn succeeded(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(key: impl Into<String>, error: SearchIndexError) -> Self {
        Self {
            key: key.into(),
            success: false,
            error: Some(error),
        }
    }
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Bulk requests can partially fail; the summary lets callers decide how to
/// treat rejected items.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from per-item results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Fold the results of another chunk into this summary.
    pub fn merge(&mut self, other: BatchOperationSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.results.extend(other.results);
    }

    /// Keys of the items the index rejected.
    pub fn failed_keys(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_results() {
        let summary = BatchOperationSummary::from_results(vec![
            BatchOperationResult::succeeded("P1"),
            BatchOperationResult::failed("P2", SearchIndexError::index("mapper_parsing_exception")),
            BatchOperationResult::succeeded("P3"),
        ]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failed_keys().collect::<Vec<_>>(), vec!["P2"]);
    }

    #[test]
    fn test_summary_merge() {
        let mut summary =
            BatchOperationSummary::from_results(vec![BatchOperationResult::succeeded("P1")]);
        summary.merge(BatchOperationSummary::from_results(vec![
            BatchOperationResult::succeeded("P2"),
            BatchOperationResult::failed("P3", SearchIndexError::index("rejected")),
        ]));

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.results.len(), 3);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchOperationSummary::default();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.failed_keys().count(), 0);
    }
}
