//! Query expression parsing and evaluation
//!
//! Records are selected with a small boolean filter language made of infix
//! conditions over (possibly nested) fields.
//!
//! # Syntax
//!
//! ```text
//! expr      := term (("and" | "or") term)*
//! term      := "not" ("(" expr ")" | condition) | "(" expr ")" | condition
//! condition := field operator value
//! operator  := == | != | > | < | >= | <= | contains
//! field     := name ("." name)*
//! ```
//!
//! `and` and `or` have equal precedence and are applied left to right, so
//! `a or b and c` means `(a or b) and c`. Use parentheses to group otherwise.
//!
//! Values are coerced in this order: `'quoted string'`, integer, float,
//! ISO-8601 date/time, bare text. Numerals must be quoted to compare against
//! string fields.
//!
//! # Examples
//!
//! ```text
//! age > 25 and city == 'New York'
//! contact.email == 'a@x.com'
//! (city == 'Boston') or (joined > 2025-08-01)
//! not (age <= 30)
//! name contains 'smith'
//! ```
//!
//! Evaluation never fails. Malformed pieces resolve to `false`, so a broken
//! query selects fewer records rather than aborting a scan. A `not` followed by
//! a malformed condition makes its whole level `false`, so
//! `age == 30 or not age` selects nothing.
//!
//! An unmatched `)` ends evaluation at that point and the rest of the
//! expression is ignored. A query that *starts* with `)` therefore has no
//! conditions and matches every record, just like the empty query.

pub mod condition;
pub mod eval;
pub mod literal;
pub mod resolve;
pub mod token;

pub use condition::evaluate_condition;
pub use eval::ParseCursor;
pub use literal::coerce;
pub use resolve::resolve;
pub use token::{Keyword, Operator, Token, TokenKind, tokenize};

use crate::value::Record;

/// Default ceiling on nested groups
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Deepest allowed nesting of `( ... )` and `not ( ... )` groups
    pub max_depth: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A tokenized query, reusable across every record of a scan
#[derive(Debug, Clone)]
pub struct Query {
    source: String,
    tokens: Vec<Token>,
    options: QueryOptions,
}

impl Query {
    pub fn parse(expression: &str) -> Self {
        Self::with_options(expression, QueryOptions::default())
    }

    pub fn with_options(expression: &str, options: QueryOptions) -> Self {
        Self {
            source: expression.to_string(),
            tokens: tokenize(expression),
            options,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        ParseCursor::new(&self.tokens, self.options.max_depth).run(record)
    }

    /// Keep the `(id, record)` pairs whose record matches
    pub fn filter<'a, I>(&self, records: I) -> Vec<(&'a str, &'a Record)>
    where
        I: IntoIterator<Item = (&'a str, &'a Record)>,
    {
        records
            .into_iter()
            .filter(|(_, record)| self.matches(record))
            .collect()
    }
}

/// Evaluate `expression` against one record with default options
pub fn matches(expression: &str, record: &Record) -> bool {
    Query::parse(expression).matches(record)
}

pub fn matches_with(expression: &str, record: &Record, options: QueryOptions) -> bool {
    Query::with_options(expression, options).matches(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(json: serde_json::Value) -> Record {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_query_is_reusable_across_records() {
        let query = Query::parse("age > 25 and city == 'New York'");
        let alice = record(json!({"age": 30, "city": "New York"}));
        let bob = record(json!({"age": 25, "city": "Boston"}));
        let charlie = record(json!({"age": 35, "city": "New York"}));

        assert!(query.matches(&alice));
        assert!(!query.matches(&bob));
        assert!(query.matches(&charlie));
    }

    #[test]
    fn test_parse_keeps_source_and_tokens() {
        let query = Query::parse("city == 'New York'");
        assert_eq!(query.source(), "city == 'New York'");
        assert_eq!(query.tokens().len(), 3);
        assert_eq!(query.tokens()[2].text, "'New York'");
        assert!(!query.is_empty());

        let blank = Query::parse("  ");
        assert!(blank.is_empty());
        assert!(blank.matches(&Record::new()));
    }

    #[test]
    fn test_filter_keeps_matching_ids() {
        let a = record(json!({"n": 1}));
        let b = record(json!({"n": 2}));
        let query = Query::parse("n >= 2");
        let hits = query.filter([("a", &a), ("b", &b)]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "b");
    }

    #[test]
    fn test_matches_with_custom_depth() {
        let rec = record(json!({"a": 1}));
        let options = QueryOptions::new().max_depth(0);
        assert!(!matches_with("(a == 1)", &rec, options));
        assert!(matches_with("a == 1", &rec, options));
    }
}
