//! Tolerant `deserialize_with` helpers for JSON written by browsers and by
//! the model, where numbers and strings are routinely swapped.

use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// Any scalar becomes its string form. `null` and absent fields are `None`;
/// arrays and objects keep their JSON text so enumeration checks reject them
/// with their own message.
pub fn scalar_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Numbers and numeric strings parse; anything else is treated as absent so
/// the caller falls back to its default.
pub fn loose_number<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(number_from_value))
}

/// Ids may come back as `"q1"` or `1`.
pub fn string_or_number<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Informational year: `2023` or `"2023"`. Unparseable values become 0.
pub fn lenient_year<'de, D>(d: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let year = number_from_value(&Value::deserialize(d)?)
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
        .unwrap_or(0);
    Ok(year)
}

/// Answer index as an integer or an integer string. Range checking is left
/// to validation.
pub fn index_number<'de, D>(d: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(d)?;
    number_from_value(&value)
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u8::MAX))
        .map(|n| n as u8)
        .ok_or_else(|| D::Error::custom(format!("correctIndex must be an integer, got {value}")))
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
