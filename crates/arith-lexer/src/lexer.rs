//! Core arith lexer: converts expression text to a token stream.
//!
//! Features:
//! - Number literals of the form `digits` or `digits.digits`
//! - The four operators and parentheses
//! - Whitespace (including newlines) is insignificant and skipped
//! - Error recovery: collects up to 20 errors instead of stopping at the first

use arith_types::{Diagnostics, ErrorKind, EvalError, SourceFile, Span};

use crate::token::{Token, TokenKind};

/// The arith lexer.
///
/// Converts source text into a vector of [`Token`]s, collecting up to
/// [`arith_types::MAX_ERRORS`] errors along the way.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Source file for error reporting.
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    /// Collected errors.
    errors: Diagnostics,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// The token stream (always ends with [`TokenKind::Eof`]).
    pub tokens: Vec<Token>,
    /// Errors encountered during lexing.
    pub errors: Diagnostics,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: &source_file.source,
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: Diagnostics::empty(),
        }
    }

    /// Lex the entire source into a token stream.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn emit_error(&mut self, err: EvalError) {
        self.errors.push(err);
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token, skipping over (and reporting) anything invalid.
    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            if self.errors.is_full() {
                return Token::new(TokenKind::Eof, self.current_span());
            }

            let start_line = self.line;
            let start_col = self.col;
            let Some(ch) = self.peek() else {
                return Token::new(TokenKind::Eof, self.current_span());
            };

            if ch.is_ascii_digit() || ch == '.' {
                if let Some(token) = self.scan_number(start_line, start_col) {
                    return token;
                }
                continue;
            }

            self.advance();
            let kind = match ch {
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                _ => {
                    let span = self.span_from(start_line, start_col);
                    let mut err = EvalError::at(
                        self.source_file,
                        ErrorKind::InvalidCharacter,
                        format!("unexpected character '{ch}'"),
                        span,
                    );
                    if let Some(hint) = suggestion_for(ch) {
                        err = err.with_suggestion(hint);
                    }
                    self.emit_error(err);
                    continue;
                }
            };
            return Token::new(kind, self.span_from(start_line, start_col));
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a maximal run of digits and dots and validate it as
    /// `digits ('.' digits)?`. Returns `None` after reporting a malformed
    /// literal.
    fn scan_number(&mut self, start_line: u32, start_col: u32) -> Option<Token> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.advance();
        }
        let text = &self.source[start..self.pos];
        let span = self.span_from(start_line, start_col);

        if is_well_formed_number(text) {
            if let Ok(value) = text.parse::<f64>() {
                return Some(Token::new(TokenKind::NumberLit(value), span));
            }
        }

        let err = EvalError::at(
            self.source_file,
            ErrorKind::MalformedExpression,
            format!("malformed number literal '{text}'"),
            span,
        )
        .with_suggestion(number_suggestion(text));
        self.emit_error(err);
        None
    }

    #[cfg(test)]
    fn remaining(&self) -> &str {
        &self.source[self.pos..]
    }
}

/// `digits` or `digits.digits`, nothing else.
fn is_well_formed_number(text: &str) -> bool {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.is_none_or(all_digits)
}

fn number_suggestion(text: &str) -> String {
    if text == "." {
        "a decimal point must sit between digits".to_string()
    } else if text.matches('.').count() > 1 {
        "a number may contain at most one decimal point".to_string()
    } else if let Some(frac) = text.strip_prefix('.') {
        format!("write a leading zero: '0.{frac}'")
    } else if let Some(int) = text.strip_suffix('.') {
        format!("drop the trailing point ('{int}') or add a fraction ('{int}.0')")
    } else {
        "numbers are written as digits with an optional fractional part".to_string()
    }
}

fn suggestion_for(ch: char) -> Option<&'static str> {
    match ch {
        '×' | 'x' | 'X' | '·' => Some("use '*' for multiplication"),
        '÷' | ':' => Some("use '/' for division"),
        '−' | '–' => Some("use the ASCII '-' for subtraction"),
        ',' => Some("use '.' as the decimal separator"),
        '[' | '{' => Some("use '(' to group"),
        ']' | '}' => Some("use ')' to close a group"),
        '^' => Some("exponentiation is not supported; multiply explicitly"),
        '%' => Some("remainder is not supported"),
        '=' => Some("enter only the expression, without '='"),
        c if c.is_alphabetic() => Some("variables and functions are not supported"),
        _ => None,
    }
}
