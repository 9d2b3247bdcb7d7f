//! Token types for the arith lexer.

use arith_types::Span;
use std::fmt;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every token kind in the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Unsigned numeric literal (integer or decimal): `42`, `3.14`
    NumberLit(f64),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// `+` or `-`: the characters that form sign runs.
    pub fn is_sign(&self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::NumberLit(n) => write!(f, "{n}"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_operators() {
        assert_eq!(TokenKind::Plus.to_string(), "+");
        assert_eq!(TokenKind::Minus.to_string(), "-");
        assert_eq!(TokenKind::Star.to_string(), "*");
        assert_eq!(TokenKind::Slash.to_string(), "/");
        assert_eq!(TokenKind::LParen.to_string(), "(");
        assert_eq!(TokenKind::RParen.to_string(), ")");
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(TokenKind::NumberLit(42.0).to_string(), "42");
        assert_eq!(TokenKind::NumberLit(2.75).to_string(), "2.75");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }

    #[test]
    fn test_is_sign() {
        assert!(TokenKind::Plus.is_sign());
        assert!(TokenKind::Minus.is_sign());
        assert!(!TokenKind::Star.is_sign());
        assert!(!TokenKind::NumberLit(1.0).is_sign());
    }
}
