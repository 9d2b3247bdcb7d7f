//! Expression tree for arithmetic input.
//!
//! Every node carries a [`Span`] for error reporting.
//! Recursive children are boxed to keep enum sizes reasonable.

use crate::Span;
use std::fmt;

/// A spanned expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Take this node's kind, leaving a placeholder literal behind.
    pub fn take_kind(&mut self) -> ExprKind {
        std::mem::replace(&mut self.kind, ExprKind::Literal(0.0))
    }
}

/// Drops children from a worklist so a long `+`/`-` chain does not recurse
/// once per node.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Expr>> = Vec::new();
        push_children(self.take_kind(), &mut pending);
        while let Some(mut child) = pending.pop() {
            push_children(child.take_kind(), &mut pending);
        }
    }
}

fn push_children(kind: ExprKind, pending: &mut Vec<Box<Expr>>) {
    match kind {
        ExprKind::Literal(_) => {}
        ExprKind::Negate(inner) | ExprKind::Group(inner) => pending.push(inner),
        ExprKind::Binary { left, right, .. } => {
            pending.push(left);
            pending.push(right);
        }
    }
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `3.5`
    Literal(f64),
    /// A collapsed sign run with an odd number of `-`: `-x`, `+-x`, `---x`
    Negate(Box<Expr>),
    /// `a + b`, `a * b`, ...
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `(expr)`
    Group(Box<Expr>),
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the tree as an s-expression, e.g. `(+ 2 (* 3 4))`.
///
/// Groups are transparent; the nesting of the s-expression already shows
/// how the operands bind.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(n) => write!(f, "{n}"),
            ExprKind::Negate(inner) => write!(f, "(neg {inner})"),
            ExprKind::Binary { left, op, right } => write!(f, "({op} {left} {right})"),
            ExprKind::Group(inner) => write!(f, "{inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: f64, col: u32) -> Expr {
        Expr::new(ExprKind::Literal(n), Span::point(1, col))
    }

    fn bin(left: Expr, op: BinOp, right: Expr) -> Expr {
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

    #[test]
    fn test_display_sexpr() {
        let product = bin(lit(3.0, 3), BinOp::Mul, lit(4.0, 5));
        let sum = bin(lit(2.0, 1), BinOp::Add, product);
        assert_eq!(sum.to_string(), "(+ 2 (* 3 4))");
    }

    #[test]
    fn test_long_chain_drops_without_recursion() {
        let mut chain = lit(1.0, 1);
        for col in 2..=500_000 {
            chain = bin(chain, BinOp::Add, lit(1.0, col));
        }
        drop(chain);
    }

    #[test]
    fn test_take_kind_leaves_placeholder() {
        let mut expr = Expr::new(ExprKind::Negate(Box::new(lit(2.0, 2))), Span::new(1, 1, 1, 2));
        let kind = expr.take_kind();
        assert!(matches!(kind, ExprKind::Negate(_)));
        assert_eq!(expr.kind, ExprKind::Literal(0.0));
    }

    #[test]
    fn test_display_negate_and_group() {
        let inner = bin(lit(1.0, 2), BinOp::Sub, lit(2.5, 4));
        let group = Expr::new(ExprKind::Group(Box::new(inner)), Span::new(1, 2, 1, 6));
        let neg = Expr::new(ExprKind::Negate(Box::new(group)), Span::new(1, 1, 1, 6));
        assert_eq!(neg.to_string(), "(neg (- 1 2.5))");
    }
}
