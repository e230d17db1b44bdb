//! services/client/src/request/lenient.rs
//!
//! Field deserializers for backend JSON that is loose about types: `null` where
//! a value is expected, numbers sent as strings and the other way round.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Accepts a JSON string or number and yields its text; `null` becomes empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Accepts an integer, a float (truncated) or a numeric string; `null` becomes 0.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_i64(deserializer)?.unwrap_or_default())
}

pub(crate) fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(number_to_i64(&n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, got \"{}\"", s))),
        other => Err(D::Error::custom(format!("expected an integer, got {}", other))),
    }
}

/// Accepts a boolean, `0`/`1` or `"true"`/`"false"`; `null` becomes `false`.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(number_to_i64(&n) != 0),
        Value::String(s) => match s.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            _ => Err(D::Error::custom(format!("expected a boolean, got \"{}\"", s))),
        },
        other => Err(D::Error::custom(format!("expected a boolean, got {}", other))),
    }
}

fn number_to_i64(n: &Number) -> i64 {
    n.as_i64()
        .unwrap_or_else(|| n.as_f64().unwrap_or_default() as i64)
}
