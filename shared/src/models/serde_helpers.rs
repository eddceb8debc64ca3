//! Serde helpers for the loosely-typed order JSON produced by the POS UI
//!
//! Money and flag fields arrive as numbers, numeric strings, null, or are
//! simply absent. These deserializers accept anything and coerce through
//! the [`safe_number`](crate::money::safe_number) contract so a malformed
//! field never fails the whole request.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::money::safe_number;

/// Deserialize bool that treats null/absent as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}

/// Coerce a JSON value to f64: numbers pass through, numeric strings are
/// parsed, everything else (null, objects, bad strings) becomes 0.
pub fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => safe_number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => safe_number(s.trim().parse().unwrap_or(0.0)),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Deserialize f64 leniently; missing/invalid -> 0
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_f64).unwrap_or(0.0))
}

/// Deserialize Option<f64> leniently; null stays None so `??`-style
/// fallbacks remain distinguishable from an explicit 0
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(coerce_f64(&v)),
    })
}

/// Deserialize Option<String>, stringifying numbers (invoice numbers and
/// table numbers arrive both ways)
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(_) => None,
    })
}
