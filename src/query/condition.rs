use super::resolve::resolve;
use super::token::Operator;
use crate::value::{Record, Timestamp, Value};
use std::cmp::Ordering;

/// Evaluate one `field operator literal` condition against a record.
///
/// Total over every value pair: an absent field or a type combination the
/// operator is not defined for yields `false`.
pub fn evaluate_condition(record: &Record, field: &str, op: Operator, literal: &Value) -> bool {
    let Some(stored) = resolve(record, field) else {
        return false;
    };

    // Date-aware path; an unparseable stored value falls through. Quoted
    // date literals only take part in ordering, equality stays textual.
    let expected = match literal {
        Value::Timestamp(ts) if op.is_comparison() => Some(*ts),
        Value::Str(text) if op.is_ordering() => Timestamp::parse(text),
        _ => None,
    };
    if let Some(expected) = expected
        && let Some(actual) = stored.as_str().and_then(Timestamp::parse)
        && let Some(result) = compare_timestamps(&actual, op, &expected)
    {
        return result;
    }

    match op {
        Operator::Eq => stored == literal,
        Operator::Ne => stored != literal,
        Operator::Gt => compare_numbers(stored, literal).is_some_and(Ordering::is_gt),
        Operator::Lt => compare_numbers(stored, literal).is_some_and(Ordering::is_lt),
        Operator::Ge => compare_numbers(stored, literal).is_some_and(Ordering::is_ge),
        Operator::Le => compare_numbers(stored, literal).is_some_and(Ordering::is_le),
        Operator::Contains => match (stored, literal) {
            (Value::Str(haystack), Value::Str(needle)) => {
                haystack.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => false,
        },
    }
}

fn compare_timestamps(actual: &Timestamp, op: Operator, expected: &Timestamp) -> Option<bool> {
    match op {
        Operator::Eq => Some(actual == expected),
        Operator::Ne => Some(actual != expected),
        Operator::Contains => None,
        _ => {
            let ordering = actual.partial_cmp(expected)?;
            Some(match op {
                Operator::Gt => ordering.is_gt(),
                Operator::Lt => ordering.is_lt(),
                Operator::Ge => ordering.is_ge(),
                _ => ordering.is_le(),
            })
        }
    }
}

/// Numeric ordering, defined only when the stored value is a number
fn compare_numbers(stored: &Value, literal: &Value) -> Option<Ordering> {
    match (stored, literal) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        _ => stored.as_f64()?.partial_cmp(&literal.as_f64()?),
    }
}
