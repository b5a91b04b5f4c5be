use super::condition::evaluate_condition;
use super::literal::coerce;
use super::token::{Keyword, Operator, Token, TokenKind};
use crate::value::Record;
use std::collections::VecDeque;

/// Recursion state for evaluating one token sequence against one record.
///
/// `depth` counts open groups (`( ... )` and `not ( ... )`). Opening a group
/// past `max_depth` marks the cursor exhausted and the whole evaluation
/// resolves to `false`.
#[derive(Debug)]
pub struct ParseCursor<'t> {
    tokens: &'t [Token],
    depth: usize,
    max_depth: usize,
    exhausted: bool,
}

impl<'t> ParseCursor<'t> {
    pub fn new(tokens: &'t [Token], max_depth: usize) -> Self {
        Self {
            tokens,
            depth: 0,
            max_depth,
            exhausted: false,
        }
    }

    /// `true` once the nesting ceiling was hit
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Evaluate the whole token sequence against `record`
    pub fn run(&mut self, record: &Record) -> bool {
        self.depth = 0;
        self.exhausted = false;
        let (result, _) = self.evaluate(record, 0);
        result && !self.exhausted
    }

    /// Evaluate an expression starting at `start`, stopping at the end of the
    /// tokens or before an unconsumed `)`.
    ///
    /// `and` and `or` share one precedence level and reduce in the order they
    /// are met: `a or b and c` is `(a or b) and c`.
    pub fn evaluate(&mut self, record: &Record, start: usize) -> (bool, usize) {
        let tokens = self.tokens;
        let mut results: Vec<bool> = Vec::new();
        let mut operators: VecDeque<Keyword> = VecDeque::new();
        let mut i = start;

        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::LParen => {
                    let (result, next) = self.group(record, i + 1);
                    if self.exhausted {
                        return (false, tokens.len());
                    }
                    results.push(result);
                    i = next;
                }
                TokenKind::RParen => break,
                TokenKind::Keyword(Keyword::Not) => {
                    let Some(next_token) = tokens.get(i + 1) else {
                        return (false, i + 1);
                    };
                    if next_token.kind == TokenKind::LParen {
                        let (result, next) = self.group(record, i + 2);
                        if self.exhausted {
                            return (false, tokens.len());
                        }
                        results.push(!result);
                        i = next;
                    } else {
                        let (result, next) = self.parse_condition(record, i + 1);
                        if next == i + 1 {
                            // Nothing parseable after `not`
                            return (false, tokens.len());
                        }
                        results.push(!result);
                        i = next;
                    }
                }
                TokenKind::Keyword(keyword) => {
                    operators.push_back(keyword);
                    i += 1;
                }
                _ => {
                    let (result, next) = self.parse_condition(record, i);
                    results.push(result);
                    i = next.max(i + 1);
                }
            }

            while results.len() >= 2 {
                let Some(op) = operators.pop_front() else {
                    break;
                };
                let (Some(right), Some(left)) = (results.pop(), results.pop()) else {
                    break;
                };
                results.push(match op {
                    Keyword::Or => left || right,
                    _ => left && right,
                });
            }
        }

        (results.first().copied().unwrap_or(true), i)
    }

    /// Evaluate a parenthesized group whose interior starts at `start`,
    /// consuming the closing `)` when present.
    fn group(&mut self, record: &Record, start: usize) -> (bool, usize) {
        if self.depth >= self.max_depth {
            self.exhausted = true;
            return (false, self.tokens.len());
        }

        self.depth += 1;
        let (result, mut next) = self.evaluate(record, start);
        self.depth -= 1;

        if self
            .tokens
            .get(next)
            .is_some_and(|t| t.kind == TokenKind::RParen)
        {
            next += 1;
        }
        (result, next)
    }

    /// Parse and evaluate one `field operator value...` condition at `start`.
    ///
    /// With fewer than three tokens left the condition is malformed: the
    /// result is `false` and the returned index is `start`.
    pub fn parse_condition(&self, record: &Record, start: usize) -> (bool, usize) {
        let tokens = self.tokens;
        if start + 2 >= tokens.len() {
            return (false, start);
        }

        let field = &tokens[start].text;
        let operator: Option<Operator> = tokens[start + 1].text.parse().ok();

        let mut i = start + 2;
        let mut value_text: Vec<&str> = Vec::new();
        while let Some(token) = tokens.get(i) {
            if token.is_boundary() {
                break;
            }
            value_text.push(&token.text);
            i += 1;
        }

        let result = operator.is_some_and(|op| {
            let literal = coerce(&value_text.join(" "));
            evaluate_condition(record, field, op, &literal)
        });
        (result, i)
    }
}
