//! Lexer tests.
//!
//! Covers: number literals, operators, whitespace handling, span tracking,
//! malformed numbers, invalid characters, error recovery and the error cap.

use arith_lexer::{Lexer, TokenKind};
use arith_types::{ErrorKind, SourceFile, Span, MAX_ERRORS};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("<expr>", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return the spans of all tokens including Eof.
fn spans(source: &str) -> Vec<Span> {
    let sf = SourceFile::new("<expr>", source);
    Lexer::new(&sf).lex().tokens.into_iter().map(|t| t.span).collect()
}

/// Lex and return the kinds of the collected errors.
fn error_kinds(source: &str) -> Vec<ErrorKind> {
    let sf = SourceFile::new("<expr>", source);
    Lexer::new(&sf)
        .lex()
        .errors
        .errors
        .iter()
        .map(|e| e.kind)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────
// Literals and operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_and_decimal_literals() {
    assert_eq!(kinds("42"), vec![TokenKind::NumberLit(42.0)]);
    assert_eq!(kinds("3.25"), vec![TokenKind::NumberLit(3.25)]);
    assert_eq!(kinds("007"), vec![TokenKind::NumberLit(7.0)]);
    assert_eq!(kinds("0.5"), vec![TokenKind::NumberLit(0.5)]);
}

#[test]
fn test_operators_and_parens() {
    assert_eq!(
        kinds("+-*/()"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::LParen,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_signs_are_separate_tokens() {
    // Literals are unsigned; sign runs are left to the parser.
    assert_eq!(
        kinds("3--2"),
        vec![
            TokenKind::NumberLit(3.0),
            TokenKind::Minus,
            TokenKind::Minus,
            TokenKind::NumberLit(2.0),
        ]
    );
}

#[test]
fn test_whitespace_is_insignificant() {
    assert_eq!(kinds(" 2 +\t3 *\n4 "), kinds("2+3*4"));
}

#[test]
fn test_whitespace_splits_numbers() {
    assert_eq!(
        kinds("1 2"),
        vec![TokenKind::NumberLit(1.0), TokenKind::NumberLit(2.0)]
    );
}

#[test]
fn test_empty_input_is_just_eof() {
    let sf = SourceFile::new("<expr>", "");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
    assert!(!result.errors.has_errors());
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_token_spans() {
    assert_eq!(
        spans("12 + 3.5"),
        vec![
            Span::new(1, 1, 1, 2),
            Span::new(1, 4, 1, 4),
            Span::new(1, 6, 1, 8),
            Span::point(1, 9),
        ]
    );
}

#[test]
fn test_spans_across_newlines() {
    let s = spans("1 +\n  2");
    assert_eq!(s[2], Span::new(2, 3, 2, 3));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_character() {
    let sf = SourceFile::new("<expr>", "2 $ 3");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 1);
    let err = &result.errors.errors[0];
    assert_eq!(err.kind, ErrorKind::InvalidCharacter);
    assert_eq!(err.message, "unexpected character '$'");
    assert_eq!(err.span, Span::point(1, 3));
    assert_eq!(err.source_line, "2 $ 3");
}

#[test]
fn test_invalid_character_recovery_keeps_valid_tokens() {
    assert_eq!(
        kinds("2 $ 3"),
        vec![TokenKind::NumberLit(2.0), TokenKind::NumberLit(3.0)]
    );
}

#[test]
fn test_letters_are_invalid() {
    assert_eq!(
        error_kinds("2x"),
        vec![ErrorKind::InvalidCharacter]
    );
    let sf = SourceFile::new("<expr>", "2x");
    let result = Lexer::new(&sf).lex();
    assert_eq!(
        result.errors.errors[0].suggestion.as_deref(),
        Some("use '*' for multiplication")
    );
}

#[test]
fn test_non_ascii_character_is_one_error() {
    let sf = SourceFile::new("<expr>", "6÷2");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(result.errors.errors[0].message, "unexpected character '÷'");
    assert_eq!(result.errors.errors[0].span, Span::point(1, 2));
    assert_eq!(result.tokens[1].span, Span::point(1, 3));
}

#[test]
fn test_malformed_numbers() {
    for src in ["5.", ".5", ".", "1.2.3", "1..2"] {
        assert_eq!(
            error_kinds(src),
            vec![ErrorKind::MalformedExpression],
            "source '{src}'"
        );
    }
}

#[test]
fn test_malformed_number_span_covers_lexeme() {
    let sf = SourceFile::new("<expr>", "1 + 2.3.4");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.errors[0].span, Span::new(1, 5, 1, 9));
    assert_eq!(
        result.errors.errors[0].message,
        "malformed number literal '2.3.4'"
    );
}

#[test]
fn test_error_cap() {
    let source = "#".repeat(MAX_ERRORS + 10);
    let sf = SourceFile::new("<expr>", source);
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.errors.len(), MAX_ERRORS);
    assert_eq!(result.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
}

#[test]
fn test_lexer_determinism_100_iterations() {
    let first = kinds("(1 + 2.5) * -3 / 4");
    for i in 0..100 {
        assert_eq!(first, kinds("(1 + 2.5) * -3 / 4"), "Determinism failure at iteration {i}");
    }
}
