use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\b(?:and|or|not)\b|==|!=|>=|<=|>|<|contains|\(|\))")
        .expect("valid boundary regex")
});

/// Comparison operators accepted between a field and a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Contains,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Contains => "contains",
        }
    }

    /// `true` for the operators that take part in date-aware comparison
    pub fn is_comparison(&self) -> bool {
        !matches!(self, Operator::Contains)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le
        )
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            ">=" => Ok(Operator::Ge),
            "<=" => Ok(Operator::Le),
            _ if s.eq_ignore_ascii_case("contains") => Ok(Operator::Contains),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean keywords joining or negating conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    And,
    Or,
    Not,
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Keyword::And),
            "or" => Ok(Keyword::Or),
            "not" => Ok(Keyword::Not),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    QuotedString,
    Operator(Operator),
    Keyword(Keyword),
    LParen,
    RParen,
}

/// A lexical unit of a query expression.
///
/// `text` is the source text of the token. Quoted literals keep their
/// surrounding quotes so value coercion can tell them apart from numerals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn classify(text: String) -> Self {
        let kind = if text == "(" {
            TokenKind::LParen
        } else if text == ")" {
            TokenKind::RParen
        } else if let Ok(keyword) = text.parse::<Keyword>() {
            TokenKind::Keyword(keyword)
        } else if let Ok(op) = text.parse::<Operator>() {
            TokenKind::Operator(op)
        } else if text.starts_with('\'') {
            TokenKind::QuotedString
        } else {
            TokenKind::Ident
        };
        Token { kind, text }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Tokens that end the greedy capture of a condition's value text
    pub fn is_boundary(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_) | TokenKind::RParen)
    }
}

/// Split a query expression into tokens.
///
/// Never fails. Text between single quotes is kept intact, whitespace
/// included; an unterminated quote runs to the end of the input.
pub fn tokenize(expression: &str) -> Vec<Token> {
    let spaced = insert_boundaries(expression);

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in spaced.chars() {
        if ch == '\'' {
            in_quotes = !in_quotes;
            current.push(ch);
        } else if ch.is_whitespace() && !in_quotes {
            push_token(&mut tokens, &mut current);
        } else {
            current.push(ch);
        }
    }
    push_token(&mut tokens, &mut current);

    tokens
}

fn push_token(tokens: &mut Vec<Token>, current: &mut String) {
    let text = std::mem::take(current);
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        tokens.push(Token::classify(trimmed.to_string()));
    }
}

/// Pad operators, keywords and parentheses with spaces outside of quotes
fn insert_boundaries(expression: &str) -> String {
    let mut out = String::with_capacity(expression.len() * 2);
    let mut in_quotes = false;

    for (idx, segment) in expression.split('\'').enumerate() {
        if idx > 0 {
            out.push('\'');
            in_quotes = !in_quotes;
        }
        if in_quotes {
            out.push_str(segment);
        } else {
            out.push_str(&BOUNDARY_RE.replace_all(segment, " ${1} "));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(expression: &str) -> Vec<String> {
        tokenize(expression).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_simple_condition() {
        let tokens = tokenize("age > 25");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::Gt));
        assert_eq!(tokens[2].kind, TokenKind::Ident);
    }

    #[test]
    fn test_operators_without_whitespace_are_split() {
        assert_eq!(texts("age>=25"), vec!["age", ">=", "25"]);
        assert_eq!(
            texts("(a==1)or(b!=2)"),
            vec!["(", "a", "==", "1", ")", "or", "(", "b", "!=", "2", ")"]
        );
    }

    #[test]
    fn test_quoted_literal_keeps_spaces_and_keywords() {
        let tokens = tokenize("name == 'Jane  and (Q) Public'");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, TokenKind::QuotedString);
        assert_eq!(tokens[2].text, "'Jane  and (Q) Public'");
    }

    #[test]
    fn test_unterminated_quote_is_emitted() {
        let tokens = tokenize("name == 'Jane Q");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "'Jane Q");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let tokens = tokenize("a == 1 AND NOT b CONTAINS 'x'");
        assert!(tokens[3].is_keyword(Keyword::And));
        assert!(tokens[4].is_keyword(Keyword::Not));
        assert_eq!(tokens[6].kind, TokenKind::Operator(Operator::Contains));
    }

    #[test]
    fn test_keyword_inside_identifier_is_not_split() {
        assert_eq!(texts("order == 1"), vec!["order", "==", "1"]);
        assert_eq!(texts("android != 2"), vec!["android", "!=", "2"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_boundary_tokens() {
        let tokens = tokenize("and or not ) (");
        assert!(tokens[..4].iter().all(Token::is_boundary));
        assert!(!tokens[4].is_boundary());
    }
}
