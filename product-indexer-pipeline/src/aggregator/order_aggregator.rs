//! Order aggregator implementation.
//!
//! Scans every line item of every order once and derives the popularity and
//! price-per-unit maps consumed by the document builder.

use std::collections::HashMap;
use std::str::FromStr;

use tracing::{info, instrument, warn};

use super::outcome::{AggregationStats, LineItemOutcome};
use crate::errors::PipelineError;
use product_indexer_shared::{LineItem, Order, PopularityMap, PriceMap};

/// How a line's price contributes to price-per-unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceWeighting {
    /// `sum(line price) / sum(quantity)`: each line's listed price is summed
    /// once regardless of its quantity.
    #[default]
    RawLinePrice,
    /// `sum(line price * quantity) / sum(quantity)`.
    QuantityWeighted,
}

impl FromStr for PriceWeighting {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::RawLinePrice),
            "quantity" => Ok(Self::QuantityWeighted),
            other => Err(PipelineError::invalid_config(format!(
                "unknown price weighting '{}', expected 'raw' or 'quantity'",
                other
            ))),
        }
    }
}

/// Aggregated metrics for one run.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    /// Total ordered quantity per product.
    pub popularity: PopularityMap,
    /// Weighted price-per-unit per product that had at least one priced line.
    pub price_per_unit: PriceMap,
    /// Audit counts for the scanned line items.
    pub stats: AggregationStats,
}

/// Running sums for a single pass over the orders.
#[derive(Default)]
struct Accumulator {
    popularity: PopularityMap,
    price_sum: HashMap<String, f64>,
    qty_sum: HashMap<String, u64>,
    stats: AggregationStats,
}

impl Accumulator {
    fn add(&mut self, item: &LineItem, weighting: PriceWeighting) {
        let outcome = LineItemOutcome::classify(item);

        if let LineItemOutcome::Counted {
            product_id,
            quantity,
            priced,
        } = &outcome
        {
            let popularity = self.popularity.entry(product_id.clone()).or_insert(0);
            *popularity = popularity.saturating_add(*quantity);

            if let Some(price) = item.price().filter(|_| *priced) {
                let contribution = match weighting {
                    PriceWeighting::RawLinePrice => price,
                    PriceWeighting::QuantityWeighted => price * *quantity as f64,
                };
                *self.price_sum.entry(product_id.clone()).or_insert(0.0) += contribution;
                let qty = self.qty_sum.entry(product_id.clone()).or_insert(0);
                *qty = qty.saturating_add(*quantity);
            }
        }

        self.stats.record(&outcome);
    }

    fn finish(self) -> Aggregates {
        let price_sum = self.price_sum;
        let price_per_unit = self
            .qty_sum
            .into_iter()
            .filter(|(_, total_qty)| *total_qty > 0)
            .filter_map(|(product_id, total_qty)| {
                let sum = price_sum.get(&product_id)?;
                Some((product_id, sum / total_qty as f64))
            })
            .collect();

        Aggregates {
            popularity: self.popularity,
            price_per_unit,
            stats: self.stats,
        }
    }
}

/// Aggregator that folds order history into per-product metrics.
///
/// Malformed line items never fail the run: a missing identifier skips the
/// line, a missing or invalid quantity counts as 0 and a missing price only
/// keeps the line out of the price average.
#[derive(Debug, Clone, Default)]
pub struct OrderAggregator {
    weighting: PriceWeighting,
}

impl OrderAggregator {
    /// Create an aggregator using the raw line-price formula.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with an explicit price weighting.
    pub fn with_weighting(weighting: PriceWeighting) -> Self {
        Self { weighting }
    }

    /// Aggregate all orders of a run.
    ///
    /// The result does not depend on the order of `orders` or of the line
    /// items inside them.
    #[instrument(skip(self, orders), fields(order_count = orders.len()))]
    pub fn aggregate(&self, orders: &[Order]) -> Aggregates {
        let mut acc = Accumulator::default();

        for order in orders {
            acc.stats.orders += 1;
            for item in order.line_items() {
                acc.add(item, self.weighting);
            }
        }

        let aggregates = acc.finish();
        let stats = aggregates.stats;

        if stats.skipped > 0 {
            warn!(
                skipped = stats.skipped,
                "Skipped line items without a product id"
            );
        }

        info!(
            line_items = stats.line_items,
            products = aggregates.popularity.len(),
            priced_products = aggregates.price_per_unit.len(),
            "Aggregated order history"
        );

        aggregates
    }
}

/// Compute the popularity and price-per-unit maps with the default weighting.
pub fn aggregate(orders: &[Order]) -> (PopularityMap, PriceMap) {
    let aggregates = OrderAggregator::new().aggregate(orders);
    (aggregates.popularity, aggregates.price_per_unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn orders_from(value: serde_json::Value) -> Vec<Order> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_popularity_and_raw_price_per_unit() {
        let orders = vec![Order::new(vec![
            LineItem::new("P1", 2, Some(10.0)),
            LineItem::new("P1", 3, Some(10.0)),
        ])];

        let (popularity, prices) = aggregate(&orders);

        assert_eq!(popularity["P1"], 5);
        assert!((prices["P1"] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_quantity_weighted_price_per_unit() {
        let orders = vec![Order::new(vec![
            LineItem::new("P1", 2, Some(10.0)),
            LineItem::new("P1", 3, Some(10.0)),
        ])];

        let aggregates =
            OrderAggregator::with_weighting(PriceWeighting::QuantityWeighted).aggregate(&orders);

        assert_eq!(aggregates.popularity["P1"], 5);
        assert!((aggregates.price_per_unit["P1"] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_quantity_line() {
        let orders = vec![Order::new(vec![LineItem::new("P1", 0, Some(5.0))])];

        let aggregates = OrderAggregator::new().aggregate(&orders);

        assert_eq!(aggregates.popularity.get("P1"), Some(&0));
        assert!(aggregates.price_per_unit.get("P1").is_none());
        assert_eq!(aggregates.stats.priced, 0);
    }

    #[test]
    fn test_unpriced_lines_count_for_popularity_only() {
        let orders = vec![
            Order::new(vec![LineItem::new("P1", 4, None)]),
            Order::new(vec![LineItem::new("P1", 1, Some(8.0))]),
        ];

        let (popularity, prices) = aggregate(&orders);

        assert_eq!(popularity["P1"], 5);
        assert!((prices["P1"] - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_items_are_tolerated() {
        let orders = orders_from(json!([
            {"cart": {"items": [
                {"product_id": null, "quantity": 4, "price": 1.0},
                {"product_id": "", "quantity": 4},
                {"quantity": 9},
                {"product_id": "P1", "quantity": "abc", "price": 3.0},
                {"product_id": "P1", "quantity": "2", "price": "6.0"},
                {"product_id": "P2", "quantity": -3, "price": 1.0}
            ]}},
            {"cart": null},
            {}
        ]));

        let aggregates = OrderAggregator::new().aggregate(&orders);

        assert_eq!(aggregates.popularity.len(), 2);
        assert_eq!(aggregates.popularity["P1"], 2);
        assert_eq!(aggregates.popularity["P2"], 0);
        assert!((aggregates.price_per_unit["P1"] - 3.0).abs() < 1e-9);
        assert!(aggregates.price_per_unit.get("P2").is_none());

        assert_eq!(aggregates.stats.orders, 3);
        assert_eq!(aggregates.stats.line_items, 6);
        assert_eq!(aggregates.stats.skipped, 3);
        assert_eq!(aggregates.stats.counted, 3);
        assert_eq!(aggregates.stats.priced, 1);
    }

    #[test]
    fn test_integer_product_ids_match_strings() {
        let orders = orders_from(json!([
            {"cart": {"items": [
                {"product_id": 17, "quantity": 2},
                {"product_id": "17", "quantity": 1},
                {"product_id": 17.0, "quantity": 4}
            ]}}
        ]));

        let (popularity, _) = aggregate(&orders);

        assert_eq!(popularity.len(), 1);
        assert_eq!(popularity["17"], 7);
    }

    #[test]
    fn test_empty_history() {
        let (popularity, prices) = aggregate(&[]);
        assert!(popularity.is_empty());
        assert!(prices.is_empty());
    }

    #[test]
    fn test_price_weighting_from_str() {
        assert_eq!("raw".parse::<PriceWeighting>().unwrap(), PriceWeighting::RawLinePrice);
        assert_eq!(
            " Quantity ".parse::<PriceWeighting>().unwrap(),
            PriceWeighting::QuantityWeighted
        );
        assert!(matches!(
            "average".parse::<PriceWeighting>(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    /// (product index or missing, quantity, price in whole units)
    type Line = (Option<u8>, u64, Option<u32>);

    fn arb_orders() -> impl Strategy<Value = Vec<Vec<Line>>> {
        let line = (
            proptest::option::weighted(0.9, 0u8..5),
            0u64..20,
            proptest::option::of(0u32..500),
        );
        proptest::collection::vec(proptest::collection::vec(line, 0..8), 0..12)
    }

    fn to_orders(raw: &[Vec<Line>]) -> Vec<Order> {
        raw.iter()
            .map(|lines| {
                let items = lines
                    .iter()
                    .map(|(pid, qty, price)| match pid {
                        Some(p) => LineItem::new(format!("P{}", p), *qty, price.map(f64::from)),
                        None => LineItem {
                            product_id: None,
                            quantity: Some(json!(qty)),
                            price: price.map(|p| json!(p)),
                        },
                    })
                    .collect();
                Order::new(items)
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_popularity_is_sum_of_quantities(raw in arb_orders()) {
            let (popularity, _) = aggregate(&to_orders(&raw));

            let mut expected: HashMap<String, u64> = HashMap::new();
            for (pid, qty, _) in raw.iter().flatten() {
                if let Some(p) = pid {
                    *expected.entry(format!("P{}", p)).or_insert(0) += qty;
                }
            }

            prop_assert_eq!(popularity, expected);
        }

        #[test]
        fn prop_price_defined_iff_qualifying_line(raw in arb_orders()) {
            let (_, prices) = aggregate(&to_orders(&raw));

            let mut sums: HashMap<String, (f64, u64)> = HashMap::new();
            for (pid, qty, price) in raw.iter().flatten() {
                if let (Some(p), Some(price)) = (pid, price) {
                    if *qty > 0 {
                        let entry = sums.entry(format!("P{}", p)).or_insert((0.0, 0));
                        entry.0 += f64::from(*price);
                        entry.1 += qty;
                    }
                }
            }

            prop_assert_eq!(prices.len(), sums.len());
            for (product_id, (price_sum, qty_sum)) in sums {
                let actual = prices.get(&product_id).copied();
                prop_assert!(actual.is_some());
                prop_assert!((actual.unwrap() - price_sum / qty_sum as f64).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_aggregation_is_order_independent(raw in arb_orders()) {
            let forward = to_orders(&raw);
            let mut reversed: Vec<Vec<Line>> = raw.clone();
            reversed.reverse();
            for lines in reversed.iter_mut() {
                lines.reverse();
            }

            let (pop_a, price_a) = aggregate(&forward);
            let (pop_b, price_b) = aggregate(&to_orders(&reversed));

            prop_assert_eq!(pop_a, pop_b);
            prop_assert_eq!(price_a.len(), price_b.len());
            for (product_id, price) in price_a {
                prop_assert!((price - price_b[&product_id]).abs() < 1e-9);
            }
        }
    }
}
