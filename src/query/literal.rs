use crate::value::{Timestamp, Value};

/// Convert the raw text of a query value into a typed [`Value`].
///
/// Candidates are tried in order: single-quoted string, integer, float,
/// ISO-8601 timestamp, and finally the bare text as a string. An unquoted
/// numeral is therefore always numeric.
pub fn coerce(text: &str) -> Value {
    let text = text.trim();

    if text.starts_with('\'') && text.ends_with('\'') {
        let interior = if text.len() >= 2 {
            &text[1..text.len() - 1]
        } else {
            ""
        };
        return Value::Str(interior.to_string());
    }

    if let Ok(n) = text.parse::<i64>() {
        return Value::Int(n);
    }

    if let Ok(x) = text.parse::<f64>() {
        return Value::Float(x);
    }

    if let Some(ts) = Timestamp::parse(text) {
        return Value::Timestamp(ts);
    }

    Value::Str(text.to_string())
}
