//! Forgiving deserializers for model-produced JSON.
//!
//! Models routinely emit `null` for empty fields, booleans or strings for
//! integer flags, and floats for integer scores.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `null` as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a list of strings, a single string, or `null`. Blank entries are dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a list of strings, got {other}"
            )))
        }
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Accepts `0`/`1`, booleans, numeric strings, or `null` for integer flags.
pub fn flag<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(i32::from(b)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
            .ok_or_else(|| serde::de::Error::custom("flag is not a number")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i32)
            .map_err(|_| serde::de::Error::custom(format!("flag '{s}' is not a number"))),
        other => Err(serde::de::Error::custom(format!(
            "expected an integer flag, got {other}"
        ))),
    }
}

/// Coerces a score into an integer in `0..=100`.
/// Accepts integers, floats (rounded), and numeric strings. Returns `None`
/// for anything else.
pub fn coerce_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}
