//! Property-based tests for the query engine using proptest.

use jsondb::query::{Query, QueryOptions, matches, matches_with, tokenize};
use jsondb::value::{Record, Value};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = Record> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6..1.0e6f64).prop_map(Value::Float),
        "[a-zA-Z0-9 '-]{0,12}".prop_map(Value::Str),
    ];
    let value = leaf.prop_recursive(3, 16, 4, |inner| {
        prop::collection::btree_map("[a-c]{1,2}", inner, 0..4).prop_map(Value::Object)
    });
    prop::collection::btree_map("[a-e]{1,2}", value, 0..6)
}

fn expression_strategy() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        Just("a".to_string()),
        Just("b.c".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just(">".to_string()),
        Just("<=".to_string()),
        Just("contains".to_string()),
        Just("and".to_string()),
        Just("or".to_string()),
        Just("not".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("'x y'".to_string()),
        Just("'".to_string()),
        Just("2025-08-01".to_string()),
        any::<i32>().prop_map(|n| n.to_string()),
    ];
    prop::collection::vec(atom, 0..24).prop_map(|atoms| atoms.join(" "))
}

proptest! {
    /// Arbitrary text never panics the tokenizer or evaluator.
    #[test]
    fn arbitrary_input_is_total(expression in ".{0,64}", record in record_strategy()) {
        let _ = tokenize(&expression);
        let _ = matches(&expression, &record);
    }

    /// Evaluation is deterministic and leaves the record untouched.
    #[test]
    fn evaluation_is_deterministic_and_pure(
        expression in expression_strategy(),
        record in record_strategy(),
    ) {
        let before = record.clone();
        let query = Query::parse(&expression);
        let first = query.matches(&record);
        let second = query.matches(&record);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, matches(&expression, &record));
        prop_assert_eq!(record, before);
    }

    /// Nesting past the ceiling fails closed instead of exhausting the stack.
    #[test]
    fn deep_nesting_fails_closed(depth in 65usize..20_000, negate in any::<bool>()) {
        let open = if negate { "not (" } else { "(" };
        let expression = format!("{}a == 1{}", open.repeat(depth), ")".repeat(depth));
        let record = Record::from([("a".to_string(), Value::Int(1))]);
        prop_assert!(!matches(&expression, &record));
    }

    /// Nesting within the ceiling evaluates normally.
    #[test]
    fn nesting_within_ceiling_evaluates(depth in 0usize..=32) {
        let expression = format!("{}a == 1{}", "(".repeat(depth), ")".repeat(depth));
        let record = Record::from([("a".to_string(), Value::Int(1))]);
        let options = QueryOptions::new().max_depth(32);
        prop_assert!(matches_with(&expression, &record, options));
    }

    /// A double negation of a group is the group itself.
    #[test]
    fn double_negation_round_trips(n in any::<i64>(), threshold in any::<i64>()) {
        let record = Record::from([("n".to_string(), Value::Int(n))]);
        let plain = format!("n > {threshold}");
        let doubled = format!("not (not (n > {threshold}))");
        prop_assert_eq!(matches(&plain, &record), matches(&doubled, &record));
        prop_assert_eq!(matches(&plain, &record), n > threshold);
    }
}
