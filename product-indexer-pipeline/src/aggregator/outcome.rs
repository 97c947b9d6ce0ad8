//! Per-line-item classification used for audit counts.

use product_indexer_shared::LineItem;

/// Why a line item did not count toward any product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The line item has no usable product identifier.
    MissingProductId,
}

/// How a single line item was treated by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemOutcome {
    /// The quantity was added to the product's popularity. `priced` is set
    /// when the line also contributed to price-per-unit.
    Counted {
        product_id: String,
        quantity: u64,
        priced: bool,
    },
    /// The line was ignored.
    Skipped(SkipReason),
}

impl LineItemOutcome {
    /// Classify a line item without accumulating it.
    pub fn classify(item: &LineItem) -> Self {
        match item.product_id() {
            None => Self::Skipped(SkipReason::MissingProductId),
            Some(product_id) => {
                let quantity = item.quantity();
                Self::Counted {
                    product_id,
                    quantity,
                    priced: quantity > 0 && item.price().is_some(),
                }
            }
        }
    }
}

/// Counts gathered while aggregating one run's orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Orders scanned.
    pub orders: usize,
    /// Line items scanned across all orders.
    pub line_items: usize,
    /// Line items that counted toward popularity.
    pub counted: usize,
    /// Line items skipped for a missing product identifier.
    pub skipped: usize,
    /// Line items that contributed to price-per-unit.
    pub priced: usize,
}

impl AggregationStats {
    pub(crate) fn record(&mut self, outcome: &LineItemOutcome) {
        self.line_items += 1;
        match outcome {
            LineItemOutcome::Counted { priced, .. } => {
                self.counted += 1;
                if *priced {
                    self.priced += 1;
                }
            }
            LineItemOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}
