//! Lenient readers for loosely-typed JSON fields.
//!
//! Input records come from exported JSON where the same field may hold a
//! string, a number, or nothing at all. None of these readers fail: anything
//! that cannot be interpreted is treated as absent (or zero).

use serde_json::Value;

/// Largest float that still holds every integer exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Read an identifier. Non-empty strings and non-zero numbers are kept;
/// numbers are carried as their decimal string, with integral floats written
/// without a fraction so `17.0` and `17` name the same product.
pub(crate) fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64().filter(|f| f.is_finite() && *f != 0.0)?;
                if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT {
                    Some((f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
        }
        _ => None,
    }
}

/// Read a quantity as a non-negative integer, falling back to 0.
pub(crate) fn quantity(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(u) => u,
            None => match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 => f.trunc() as u64,
                _ => 0,
            },
        },
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        Some(Value::Bool(true)) => 1,
        _ => 0,
    }
}

/// Read a finite price from a number or a numeric string.
pub(crate) fn price(value: Option<&Value>) -> Option<f64> {
    let price = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}
