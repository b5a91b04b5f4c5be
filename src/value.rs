//! Field values stored in records and produced by query literals.
//!
//! Every record field and every coerced query literal is exactly one [`Value`]
//! variant. Documents decode straight from JSON into this model; a JSON string
//! always stays a [`Value::Str`], timestamps only appear on the query side.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A stored document: field name to value.
pub type Record = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(Timestamp),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Numeric view of `Int` and `Float`, `None` for everything else.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(n) => JsonValue::from(*n),
            // Non-finite floats have no JSON form
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Timestamp(ts) => JsonValue::String(ts.to_string()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::Array(_) | Value::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from_json(json)
    }
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// An ISO-8601 date or date-time, with or without a UTC offset.
///
/// Naive and offset-aware timestamps never compare equal and have no
/// chronological order between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl Timestamp {
    /// Parse an ISO-8601 literal such as `2025-08-01`, `2025-08-01T10:30:00`
    /// or `2025-08-01T10:30:00+02:00`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Timestamp::Aware(dt));
        }

        let zulu;
        let text = match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
            Some(stripped) => {
                zulu = format!("{stripped}+00:00");
                zulu.as_str()
            }
            None => text,
        };

        if let Some(dt) = AWARE_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        {
            return Some(Timestamp::Aware(dt));
        }

        if let Some(dt) = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        {
            return Some(Timestamp::Naive(dt));
        }

        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Timestamp::Naive)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Timestamp::Naive(a), Timestamp::Naive(b)) => Some(a.cmp(b)),
            (Timestamp::Aware(a), Timestamp::Aware(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Timestamp::Aware(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_strings_stay_strings() {
        let value: Value = serde_json::from_value(json!("2025-08-15")).unwrap();
        assert_eq!(value, Value::Str("2025-08-15".to_string()));
    }

    #[test]
    fn test_numbers_decode_by_kind() {
        let record: Record = serde_json::from_value(json!({"age": 30, "score": 4.5})).unwrap();
        assert_eq!(record["age"], Value::Int(30));
        assert_eq!(record["score"], Value::Float(4.5));
    }

    #[test]
    fn test_nested_object_decodes() {
        let record: Record =
            serde_json::from_value(json!({"contact": {"email": "a@x.com"}, "tags": [1, null]}))
                .unwrap();
        let contact = record["contact"].as_object().unwrap();
        assert_eq!(contact["email"], Value::from("a@x.com"));
        assert_eq!(
            record["tags"],
            Value::Array(vec![Value::Int(1), Value::Null])
        );
    }

    #[test]
    fn test_timestamp_parse_forms() {
        assert!(matches!(
            Timestamp::parse("2025-08-01"),
            Some(Timestamp::Naive(_))
        ));
        assert!(matches!(
            Timestamp::parse("2025-08-01T10:30"),
            Some(Timestamp::Naive(_))
        ));
        assert!(matches!(
            Timestamp::parse("2025-08-01 10:30:15.250"),
            Some(Timestamp::Naive(_))
        ));
        assert!(matches!(
            Timestamp::parse("2025-08-01T10:30:00Z"),
            Some(Timestamp::Aware(_))
        ));
        assert!(matches!(
            Timestamp::parse("2025-08-01T10:30:00+02:00"),
            Some(Timestamp::Aware(_))
        ));
        assert_eq!(Timestamp::parse("yesterday"), None);
        assert_eq!(Timestamp::parse("2025-13-01"), None);
    }

    #[test]
    fn test_naive_and_aware_are_incomparable() {
        let naive = Timestamp::parse("2025-08-01T00:00:00").unwrap();
        let aware = Timestamp::parse("2025-08-01T00:00:00Z").unwrap();
        assert_eq!(naive.partial_cmp(&aware), None);
        assert_ne!(naive, aware);
    }

    #[test]
    fn test_aware_compares_by_instant() {
        let a = Timestamp::parse("2025-08-01T12:00:00+02:00").unwrap();
        let b = Timestamp::parse("2025-08-01T10:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_json_round_trips_record_shape() {
        let json = json!({"name": "Alice", "age": 30, "nested": {"ok": true}});
        assert_eq!(Value::from_json(json.clone()).to_json(), json);
    }
}
