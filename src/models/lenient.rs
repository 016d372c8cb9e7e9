// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Serde helpers that accept both native JSON values and their text form.
//!
//! Backups carry proper numbers and arrays, while rows imported from CSV carry
//! every cell as a string. Record fields that are not strings route through
//! these helpers so both sources decode into the same types.
//!
//! Lists travel through CSV in a flat form free of commas and double quotes:
//! entries joined by `;`, and objects written as `key=value` pairs joined by `|`.
//! [`flat_text`] produces that form and the list helpers read it back.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Separator between list entries in a flattened cell.
pub const LIST_SEPARATOR: char = ';';
/// Separator between the `key=value` pairs of one flattened object.
pub const PAIR_SEPARATOR: char = '|';

/// Flat text for a list or object value; `None` for scalars, which need no flattening.
pub fn flat_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .map(flat_entry)
                .collect::<Vec<_>>()
                .join(&LIST_SEPARATOR.to_string()),
        ),
        Value::Object(map) => Some(flat_object(map)),
        _ => None,
    }
}

fn flat_entry(value: &Value) -> String {
    match value {
        Value::Object(map) => flat_object(map),
        other => flat_scalar(other),
    }
}

fn flat_object(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}={}", flat_scalar(value)))
        .collect::<Vec<_>>()
        .join(&PAIR_SEPARATOR.to_string())
}

fn flat_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Entries of a flattened list, blanks dropped.
fn split_entries(text: &str) -> impl Iterator<Item = &str> {
    text.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Read one `key=value|key=value` entry. Numbers and booleans come back typed.
fn parse_flat_object(entry: &str) -> Option<Map<String, Value>> {
    entry
        .split(PAIR_SEPARATOR)
        .map(|pair| {
            let (key, raw) = pair.split_once('=')?;
            let value = match serde_json::from_str::<Value>(raw.trim()) {
                Ok(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar,
                _ => Value::String(raw.trim().to_string()),
            };
            Some((key.trim().to_string(), value))
        })
        .collect()
}

fn number_from_value<E: serde::de::Error>(value: Value) -> Result<Option<f64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| E::custom("number out of range")),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| E::custom(format!("expected a number, found {trimmed:?}")))
        }
        other => Err(E::custom(format!("expected a number, found {other}"))),
    }
}

/// Required floating-point field; an empty cell decodes as `0`.
pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    number_from_value(Value::deserialize(de)?).map(|n| n.unwrap_or_default())
}

/// Optional floating-point field; empty cells and `null` decode as `None`.
pub fn optional_number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    number_from_value(Value::deserialize(de)?)
}

/// Non-negative count; fractional or negative input is rejected.
pub fn count<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    let n = number_from_value::<D::Error>(Value::deserialize(de)?)?.unwrap_or_default();
    if n.fract() != 0.0 || n < 0.0 || n > f64::from(u32::MAX) {
        return Err(D::Error::custom(format!("expected a whole count, found {n}")));
    }
    Ok(n as u32)
}

/// List of strings, given either as a JSON array or as text.
///
/// Text holding a JSON array is parsed as one; any other text is split on
/// [`LIST_SEPARATOR`].
pub fn string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Ok(other.to_string()),
            })
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('[')
                && let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed)
            {
                return Ok(items);
            }
            Ok(split_entries(trimmed).map(str::to_string).collect())
        }
        other => Err(D::Error::custom(format!("expected a list, found {other}"))),
    }
}

/// Optional list of flat objects, given natively, as JSON text, or in the
/// flattened `key=value|key=value;...` form.
pub fn optional_object_list<'de, D: Deserializer<'de>>(
    de: D,
) -> Result<Option<Vec<Map<String, Value>>>, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(items) = serde_json::from_str(trimmed) {
                return Ok(Some(items));
            }
            split_entries(trimmed)
                .map(|entry| {
                    parse_flat_object(entry).ok_or_else(|| {
                        D::Error::custom(format!("expected key=value pairs, found {entry:?}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
        }
        other => serde_json::from_value(other).map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::flat_text;
    use serde::Deserialize;
    use serde_json::{Map, Value, json};

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "super::number")]
        price: f64,
        #[serde(default, deserialize_with = "super::optional_number")]
        fee: Option<f64>,
        #[serde(deserialize_with = "super::count")]
        seats: u32,
        #[serde(default, deserialize_with = "super::string_list")]
        tags: Vec<String>,
    }

    #[test]
    fn numbers_accept_native_and_text_forms() {
        let native: Probe = serde_json::from_value(json!({"price": 10.5, "fee": 2, "seats": 3})).unwrap();
        let text: Probe =
            serde_json::from_value(json!({"price": "10.5", "fee": "2", "seats": "3"})).unwrap();
        assert_eq!(native.price, text.price);
        assert_eq!(native.fee, text.fee);
        assert_eq!(native.seats, text.seats);
    }

    #[test]
    fn empty_text_decodes_as_default_or_none() {
        let probe: Probe =
            serde_json::from_value(json!({"price": "", "fee": "", "seats": "", "tags": ""})).unwrap();
        assert_eq!(probe.price, 0.0);
        assert_eq!(probe.fee, None);
        assert_eq!(probe.seats, 0);
        assert!(probe.tags.is_empty());
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        let err = serde_json::from_value::<Probe>(json!({"price": "abc", "seats": 1}));
        assert!(err.is_err());
        let err = serde_json::from_value::<Probe>(json!({"price": 1, "seats": "1.5"}));
        assert!(err.is_err());
    }

    #[test]
    fn string_list_accepts_arrays_json_text_and_single_values() {
        let array: Probe =
            serde_json::from_value(json!({"price": 1, "seats": 1, "tags": ["a", "b"]})).unwrap();
        assert_eq!(array.tags, vec!["a", "b"]);
        let text: Probe =
            serde_json::from_value(json!({"price": 1, "seats": 1, "tags": "[\"a\",\"b\"]"})).unwrap();
        assert_eq!(text.tags, vec!["a", "b"]);
        let single: Probe =
            serde_json::from_value(json!({"price": 1, "seats": 1, "tags": "p-1"})).unwrap();
        assert_eq!(single.tags, vec!["p-1"]);
        let flat: Probe =
            serde_json::from_value(json!({"price": 1, "seats": 1, "tags": "a; b;"})).unwrap();
        assert_eq!(flat.tags, vec!["a", "b"]);
    }

    #[derive(Debug, Deserialize)]
    struct Items {
        #[serde(default, deserialize_with = "super::optional_object_list")]
        items: Option<Vec<Map<String, Value>>>,
    }

    #[test]
    fn flat_text_has_no_commas_or_quotes() {
        assert_eq!(flat_text(&json!(["p1", "p2"])).as_deref(), Some("p1;p2"));
        assert_eq!(
            flat_text(&json!([{"produto": "Hotel", "valor": 1200}, {"produto": "Voo"}])).as_deref(),
            Some("produto=Hotel|valor=1200;produto=Voo")
        );
        assert_eq!(flat_text(&json!("plain")), None);
    }

    #[test]
    fn object_lists_read_back_from_flat_text_with_typed_scalars() {
        let original = json!([{"produto": "Hotel", "valor": 1200.5, "pago": true}]);
        let text = flat_text(&original).unwrap();
        let parsed: Items = serde_json::from_value(json!({ "items": text })).unwrap();
        assert_eq!(Value::from(parsed.items.unwrap()), original);

        let json_text: Items =
            serde_json::from_value(json!({"items": "[{\"produto\": \"Voo\"}]"})).unwrap();
        assert_eq!(json_text.items.unwrap()[0]["produto"], "Voo");

        assert!(serde_json::from_value::<Items>(json!({"items": "sem pares"})).is_err());
    }
}
