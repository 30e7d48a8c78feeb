//! Deserialization helpers for the wire formats sync clients actually send.
//!
//! Boolean-ish flags arrive as true/false, 0/1, or are absent entirely.
//! The file relay derives identifiers from filenames and posts them as
//! strings. Both shapes are accepted here so the handlers stay strict
//! everywhere else.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a 0/1 flag from bool, number, string, or null.
///
/// Truthiness matches the stored convention: absent, null, 0, and the
/// empty string are 0; everything else is 1.
pub fn flag_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(flag_value(&value))
}

fn flag_value(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => i64::from(n.as_f64().map(|f| f != 0.0).unwrap_or(true)),
        Value::String(s) => i64::from(!s.is_empty()),
        _ => 1,
    }
}

/// Deserialize an optional integer identifier from a number or a numeric
/// string.
pub fn opt_id_from_any<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("identifier is not an integer")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom("identifier is not an integer")),
        _ => Err(serde::de::Error::custom("identifier is not an integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "flag_from_any")]
        mother: i64,
        #[serde(default, deserialize_with = "opt_id_from_any")]
        id: Option<i64>,
    }

    #[test]
    fn test_flag_shapes() {
        let f: Flags = serde_json::from_str(r#"{"mother": true}"#).unwrap();
        assert_eq!(f.mother, 1);
        let f: Flags = serde_json::from_str(r#"{"mother": 0}"#).unwrap();
        assert_eq!(f.mother, 0);
        let f: Flags = serde_json::from_str(r#"{"mother": 1}"#).unwrap();
        assert_eq!(f.mother, 1);
        let f: Flags = serde_json::from_str(r#"{"mother": null}"#).unwrap();
        assert_eq!(f.mother, 0);
        let f: Flags = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(f.mother, 0);
    }

    #[test]
    fn test_id_shapes() {
        let f: Flags = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(f.id, Some(42));
        let f: Flags = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        assert_eq!(f.id, Some(42));
        let f: Flags = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(f.id, None);
        assert!(serde_json::from_str::<Flags>(r#"{"id": "x"}"#).is_err());
    }
}
