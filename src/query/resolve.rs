use crate::value::{Record, Value};

/// Walk a dot-separated path through a record.
///
/// Returns `None` when any segment is missing or an intermediate value is not
/// an object. A field explicitly holding `null` resolves to `Value::Null`.
pub fn resolve<'r>(record: &'r Record, path: &str) -> Option<&'r Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;

    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(json: serde_json::Value) -> Record {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_top_level_field() {
        let rec = record(json!({"name": "Alice"}));
        assert_eq!(resolve(&rec, "name"), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_nested_field() {
        let rec = record(json!({"contact": {"address": {"city": "Oslo"}}}));
        assert_eq!(
            resolve(&rec, "contact.address.city"),
            Some(&Value::from("Oslo"))
        );
    }

    #[test]
    fn test_missing_segment_is_absent() {
        let rec = record(json!({"a": {}}));
        assert_eq!(resolve(&rec, "a.b.c"), None);
        assert_eq!(resolve(&rec, "missing"), None);
    }

    #[test]
    fn test_non_object_intermediate_is_absent() {
        let rec = record(json!({"a": "text", "list": [{"b": 1}]}));
        assert_eq!(resolve(&rec, "a.b"), None);
        assert_eq!(resolve(&rec, "list.0.b"), None);
    }

    #[test]
    fn test_null_is_not_absent() {
        let rec = record(json!({"deleted_at": null}));
        assert_eq!(resolve(&rec, "deleted_at"), Some(&Value::Null));
    }
}
