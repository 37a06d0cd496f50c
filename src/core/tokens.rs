//! Lenient numeric coercion for token counts and per-token rates
//!
//! Log files and the pricing catalog are written by tools we do not control.
//! Anything that is not a finite, non-negative number becomes 0 (tokens) or
//! "no rate" (prices) instead of failing the whole line.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn float_tokens(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

/// Coerce a JSON value into a token count.
pub(crate) fn coerce_tokens(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .unwrap_or_else(|| n.as_f64().map_or(0, float_tokens)),
        Value::String(s) => s.trim().parse::<f64>().map_or(0, float_tokens),
        _ => 0,
    }
}

/// Coerce a JSON value into a per-token rate.
pub(crate) fn coerce_rate(value: &Value) -> Option<f64> {
    let rate = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (rate.is_finite() && rate >= 0.0).then_some(rate)
}

/// `deserialize_with` helper for token fields (use together with `#[serde(default)]`).
pub(crate) fn lenient_tokens<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, coerce_tokens))
}

/// `deserialize_with` helper for optional amounts such as a reported cost.
pub(crate) fn lenient_rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_rate))
}
