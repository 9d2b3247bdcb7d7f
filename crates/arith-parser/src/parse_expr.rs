//! Expression parsing with operator precedence.
//!
//! Precedence (lowest → highest):
//! 3. `+`, `-` (left-associative)
//! 2. `*`, `/` (left-associative)
//! 1. sign runs (`-`, `+`, `--`, `+-+` ...), parentheses
//!
//! A sign run collapses to a single negation when it holds an odd number of
//! `-`, and to nothing otherwise. After a complete operand the first `+`/`-`
//! is the binary operator and the rest of the run belongs to the next
//! operand, so `3--2` parses as `3 - (-2)`.

use arith_lexer::token::TokenKind;
use arith_types::ast::*;
use arith_types::ErrorKind;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_add()
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Option<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    /// `MulExpr = SignedExpr { ("*" | "/") SignedExpr }`
    fn parse_mul(&mut self) -> Option<Expr> {
        let mut left = self.parse_signed()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_signed()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    /// `SignedExpr = { "+" | "-" } Primary`
    fn parse_signed(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let mut signs = 0usize;
        let mut negations = 0usize;
        while self.peek_kind().is_sign() {
            if self.peek_kind() == &TokenKind::Minus {
                negations += 1;
            }
            signs += 1;
            self.advance();
        }

        let mut operand = self.parse_primary()?;
        if signs == 0 {
            return Some(operand);
        }

        let span = start.merge(operand.span);
        if negations % 2 == 1 {
            Some(Expr::new(ExprKind::Negate(Box::new(operand)), span))
        } else {
            Some(Expr::new(operand.take_kind(), span))
        }
    }

    /// `Primary = NumberLit | "(" Expr ")"`
    fn parse_primary(&mut self) -> Option<Expr> {
        match self.peek_kind().clone() {
            TokenKind::NumberLit(value) => {
                let span = self.advance();
                Some(Expr::new(ExprKind::Literal(value), span))
            }
            TokenKind::LParen => self.parse_group(),
            _ => {
                self.report_missing_operand();
                None
            }
        }
    }

    /// `"(" Expr ")"`, bounded by the nesting limit.
    fn parse_group(&mut self) -> Option<Expr> {
        let open = self.advance();
        if self.check_kind(&TokenKind::RParen) {
            let close = self.current_span();
            self.error_at(
                ErrorKind::MalformedExpression,
                "empty parentheses",
                open.merge(close),
            );
            return None;
        }

        self.depth += 1;
        if self.depth > self.max_depth {
            let message = format!("maximum nesting depth is {}", self.max_depth);
            self.error_at(ErrorKind::NestingTooDeep, message, open);
            self.depth -= 1;
            return None;
        }
        let inner = self.parse_expression();
        self.depth -= 1;
        let inner = inner?;

        if !self.check_kind(&TokenKind::RParen) {
            let message = format!("expected ')' but found {}", describe(self.peek_kind()));
            self.error_at_current(ErrorKind::MalformedExpression, message);
            return None;
        }
        let close = self.advance();
        Some(Expr::new(ExprKind::Group(Box::new(inner)), open.merge(close)))
    }

    fn check_kind(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Report that an operand was expected at the current token.
    fn report_missing_operand(&mut self) {
        let found = describe(self.peek_kind());
        let message = match self.previous_kind() {
            Some(prev) => format!("expected a number or '(' after '{prev}', found {found}"),
            None => format!("expected a number or '(', found {found}"),
        };
        self.error_at_current(ErrorKind::MalformedExpression, message);
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Eof => "end of input".to_string(),
        other => format!("'{other}'"),
    }
}
