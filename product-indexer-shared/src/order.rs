//! Order history records.
//!
//! Orders are exported JSON with no enforced schema. Deserialization never
//! fails on shape: a cart or line item that is not an object reads as empty,
//! and the aggregator skips a line item without a product identifier.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;

/// A historical order. Only the cart contents matter to the indexer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Order {
    pub cart: Option<Cart>,
}

impl From<Value> for Order {
    fn from(mut value: Value) -> Self {
        let cart = value
            .get_mut("cart")
            .map(Value::take)
            .filter(Value::is_object)
            .map(Cart::from);
        Self { cart }
    }
}

impl Order {
    /// Create an order whose cart holds the given line items.
    pub fn new(items: Vec<LineItem>) -> Self {
        Self {
            cart: Some(Cart { items: Some(items) }),
        }
    }

    /// Line items of the order; empty when the cart or its items are missing.
    pub fn line_items(&self) -> &[LineItem] {
        self.cart.as_ref().map(Cart::items).unwrap_or_default()
    }
}

/// The cart of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Cart {
    pub items: Option<Vec<LineItem>>,
}

impl From<Value> for Cart {
    fn from(mut value: Value) -> Self {
        let items = match value.get_mut("items").map(Value::take) {
            Some(Value::Array(items)) => Some(items.into_iter().map(LineItem::from).collect()),
            _ => None,
        };
        Self { items }
    }
}

impl Cart {
    pub fn items(&self) -> &[LineItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

/// A single cart line.
///
/// Fields are kept as raw JSON so that malformed values survive
/// deserialization; the accessors interpret them leniently. A line that is
/// not a JSON object has no fields at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct LineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
}

impl From<Value> for LineItem {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        let mut field = |key: &str| fields.remove(key).filter(|v| !v.is_null());
        Self {
            product_id: field("product_id"),
            quantity: field("quantity"),
            price: field("price"),
        }
    }
}

impl LineItem {
    /// Create a well-formed line item.
    pub fn new(product_id: impl Into<String>, quantity: u64, price: Option<f64>) -> Self {
        Self {
            product_id: Some(Value::String(product_id.into())),
            quantity: Some(Value::from(quantity)),
            price: price.map(Value::from),
        }
    }

    /// The referenced product, or `None` when the identifier is missing or empty.
    pub fn product_id(&self) -> Option<String> {
        coerce::identifier(self.product_id.as_ref())
    }

    /// Ordered quantity; missing or invalid quantities read as 0.
    pub fn quantity(&self) -> u64 {
        coerce::quantity(self.quantity.as_ref())
    }

    /// Listed unit price, if present and numeric.
    pub fn price(&self) -> Option<f64> {
        coerce::price(self.price.as_ref())
    }
}
