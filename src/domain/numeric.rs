//! Lenient number handling shared by request parsing, the exchange table file
//! and the stored history.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value to a finite number.
///
/// Strings are trimmed; an empty string reads as 0 and `null` as 0, booleans
/// as 1/0. Unparsable, non-finite, array and object values yield `fallback`.
pub fn safe_num(value: &Value, fallback: f64) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Array(_) | Value::Object(_) => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n,
        _ => fallback,
    }
}

/// Same as [`safe_num`] for a field that may be absent.
pub fn safe_opt_num(value: Option<&Value>, fallback: f64) -> f64 {
    value.map_or(fallback, |v| safe_num(v, fallback))
}

/// `deserialize_with` helper: any JSON value through [`safe_num`] with a 0
/// fallback.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(safe_num(&value, 0.0))
}

/// Serde adapter for `f64` fields that may hold a non-computable value.
///
/// Non-finite values are written as `null` and `null` reads back as NaN, so a
/// stored record with an overflowed field stays readable.
pub mod finite_or_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
