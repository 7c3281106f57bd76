//! Formula tokenizer.
//!
//! Splits a formula body (the text after the leading `=`) into numbers,
//! identifiers and operator/paren symbols. Whitespace is skipped; anything
//! else is an [`FormulaError::UnrecognizedToken`].

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::error::{FormulaError, FormulaResult};

/// A single lexical unit of a formula.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    /// Identifier, upper-cased (cell references are case-insensitive).
    Identifier(String),
    Operator(char),
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Identifier(name) => f.write_str(name),
            Token::Operator(op) => write!(f, "{}", op),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?<number>[0-9]+(?:\.[0-9]*)?|\.[0-9]+)|(?<ident>[A-Za-z][A-Za-z0-9]*)|(?<symbol>[-+*/()]))",
        )
        .expect("token regex must compile")
    })
}

/// Lazy token stream over a formula body.
///
/// A clone resumes from the same position; [`Tokenizer::new`] starts over.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            pos: 0,
            failed: false,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// The run of characters that failed to match, up to the next whitespace
    /// or recognised symbol.
    fn unrecognized_run(&self) -> &'a str {
        let rest = &self.input[self.pos..];
        let end = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_whitespace() || "+-*/()".contains(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = FormulaResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }

        let rest = &self.input[self.pos..];
        let Some(caps) = token_re().captures(rest) else {
            self.failed = true;
            return Some(Err(FormulaError::UnrecognizedToken(
                self.unrecognized_run().to_string(),
            )));
        };
        let whole = caps.get(0).map_or(0, |m| m.len());
        self.pos += whole;

        let token = if let Some(m) = caps.name("number") {
            match m.as_str().parse::<f64>() {
                Ok(n) => Token::Number(n),
                Err(_) => {
                    self.failed = true;
                    return Some(Err(FormulaError::UnrecognizedToken(m.as_str().to_string())));
                }
            }
        } else if let Some(m) = caps.name("ident") {
            Token::Identifier(m.as_str().to_ascii_uppercase())
        } else {
            match rest[..whole].chars().next()? {
                '(' => Token::LeftParen,
                ')' => Token::RightParen,
                op => Token::Operator(op),
            }
        };
        Some(Ok(token))
    }
}

/// Tokenize a whole formula body.
pub fn tokenize(formula: &str) -> FormulaResult<Vec<Token>> {
    Tokenizer::new(formula).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_mixed_formula() {
        let tokens = tokenize("A1 + 2.5*(b12 - 3)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("A1".to_string()),
                Token::Operator('+'),
                Token::Number(2.5),
                Token::Operator('*'),
                Token::LeftParen,
                Token::Identifier("B12".to_string()),
                Token::Operator('-'),
                Token::Number(3.0),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_number_forms() {
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("3.").unwrap(), vec![Token::Number(3.0)]);
        assert_eq!(tokenize("  42  ").unwrap(), vec![Token::Number(42.0)]);
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unrecognized_token_names_substring() {
        assert_eq!(
            tokenize("A1 + $$x"),
            Err(FormulaError::UnrecognizedToken("$$x".to_string()))
        );
        assert_eq!(
            tokenize("3 % 2"),
            Err(FormulaError::UnrecognizedToken("%".to_string()))
        );
    }

    #[test]
    fn test_tokenizer_stops_after_error() {
        let mut tokens = Tokenizer::new("1 # 2");
        assert_eq!(tokens.next(), Some(Ok(Token::Number(1.0))));
        assert!(matches!(tokens.next(), Some(Err(_))));
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn test_tokenizer_is_lazy_and_restartable() {
        let formula = "1+2";
        let first: Vec<_> = Tokenizer::new(formula).take(1).collect();
        assert_eq!(first, vec![Ok(Token::Number(1.0))]);
        assert_eq!(Tokenizer::new(formula).count(), 3);
        assert_eq!(Tokenizer::new(formula).count(), 3);
    }
}
