//! Core parser infrastructure: token cursor, error reporting, structural checks.

use arith_lexer::token::{Token, TokenKind};
use arith_types::ast::Expr;
use arith_types::{Diagnostics, ErrorKind, EvalError, SourceFile, Span};

/// Default maximum parenthesis nesting depth.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Default maximum number of tokens (excluding the trailing Eof).
pub const DEFAULT_MAX_TOKENS: usize = 10_000;

/// Hard ceiling on the nesting depth. Larger requests are clamped to it.
pub const MAX_DEPTH_CEILING: u32 = 256;

/// Hard ceiling on the token count. Larger requests are clamped to it.
pub const MAX_TOKENS_CEILING: usize = 1_000_000;

/// The arith parser.
///
/// Consumes a token stream produced by the lexer and builds an expression
/// tree. Parsing stops at the first error.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Collected errors.
    errors: Diagnostics,
    /// Current group nesting depth.
    pub(crate) depth: u32,
    pub(crate) max_depth: u32,
    max_tokens: usize,
}

/// Result of parsing.
pub struct ParseResult {
    pub expr: Option<Expr>,
    pub errors: Diagnostics,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: Diagnostics::empty(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the maximum parenthesis nesting depth, up to
    /// [`MAX_DEPTH_CEILING`].
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    /// Override the maximum token count, up to [`MAX_TOKENS_CEILING`].
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens.min(MAX_TOKENS_CEILING);
        self
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    ///
    /// Past the end this keeps returning the final token, which the lexer
    /// guarantees is `Eof`.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.peek().map_or(&TokenKind::Eof, |t| &t.kind)
    }

    /// Advance the cursor by one and return the consumed token's span.
    pub(crate) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    /// Returns the kind of the previously consumed token.
    pub(crate) fn previous_kind(&self) -> Option<&TokenKind> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| &t.kind)
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().map_or(Span::point(1, 1), |t| t.span)
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, kind: ErrorKind, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(kind, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.push_error(EvalError::at(self.source_file, kind, message, span));
    }

    pub(crate) fn push_error(&mut self, error: EvalError) {
        self.errors.push(error);
    }

    pub(crate) fn located(&self, kind: ErrorKind, message: impl Into<String>, span: Span) -> EvalError {
        EvalError::at(self.source_file, kind, message, span)
    }

    // ── Structural checks ─────────────────────────────────────────────────────

    /// Reject token streams longer than `max_tokens`.
    fn check_length(&mut self) -> bool {
        let count = self.tokens.len().saturating_sub(1);
        if count <= self.max_tokens {
            return true;
        }
        let span = self.tokens[self.max_tokens].span;
        self.error_at(
            ErrorKind::ExpressionTooLong,
            format!(
                "expression has {count} tokens, the maximum is {}",
                self.max_tokens
            ),
            span,
        );
        false
    }

    /// Verify that every `(` has a matching `)` and vice versa.
    ///
    /// Reports the first stray `)`, or else the innermost `(` left open.
    fn check_balance(&mut self) -> bool {
        let mut open: Vec<Span> = Vec::new();
        let mut stray = None;
        for token in &self.tokens {
            match token.kind {
                TokenKind::LParen => open.push(token.span),
                TokenKind::RParen if open.pop().is_none() => {
                    stray = Some(token.span);
                    break;
                }
                _ => {}
            }
        }

        let err = match (stray, open.last()) {
            (Some(span), _) => self
                .located(ErrorKind::UnbalancedParentheses, "unmatched ')'", span)
                .with_suggestion("remove it or add a matching '(' before it"),
            (None, Some(&span)) => self
                .located(ErrorKind::UnbalancedParentheses, "unclosed '('", span)
                .with_suggestion("add a matching ')'"),
            (None, None) => return true,
        };
        self.push_error(err);
        false
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into an expression tree.
    pub fn parse(mut self) -> ParseResult {
        let expr = self.parse_root();
        ParseResult {
            expr,
            errors: self.errors,
        }
    }

    fn parse_root(&mut self) -> Option<Expr> {
        if !self.check_length() || !self.check_balance() {
            return None;
        }
        if self.at_end() {
            self.error_at_current(ErrorKind::MalformedExpression, "empty expression");
            return None;
        }

        let expr = self.parse_expression()?;

        if !self.at_end() {
            let message = format!(
                "unexpected '{}' after a complete expression",
                self.peek_kind()
            );
            let err = self
                .located(ErrorKind::MalformedExpression, message, self.current_span())
                .with_suggestion("insert an operator between the operands");
            self.push_error(err);
            return None;
        }
        Some(expr)
    }
}
