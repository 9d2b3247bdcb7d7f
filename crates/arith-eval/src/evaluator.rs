//! Tree-walking evaluator.

use arith_types::ast::{BinOp, Expr, ExprKind};
use arith_types::{ErrorKind, EvalError, SourceFile, Span};

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Walks an expression tree and produces its `f64` value.
///
/// Chains of left-associative operators are folded iteratively, so stack
/// use grows with parenthesis nesting only.
pub struct Evaluator<'src> {
    source_file: &'src SourceFile,
    /// Steps taken so far; one per evaluated node.
    pub steps: u64,
    pub step_limit: u64,
}

impl<'src> Evaluator<'src> {
    /// Create an evaluator with an unbounded step budget.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source_file,
            steps: 0,
            step_limit: u64::MAX,
        }
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Consume one step. Running out means the tree is larger than the
    /// input could have produced.
    fn tick(&mut self, span: Span) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.step_limit {
            Err(self.error(
                ErrorKind::StepLimitExceeded,
                format!("internal error: evaluation exceeded {} steps", self.step_limit),
                span,
            ))
        } else {
            Ok(())
        }
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>, span: Span) -> EvalError {
        EvalError::at(self.source_file, kind, message, span)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a float.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<f64> {
        match &expr.kind {
            ExprKind::Binary { .. } => self.eval_chain(expr),
            ExprKind::Literal(n) => {
                self.tick(expr.span)?;
                if n.is_finite() {
                    Ok(*n)
                } else {
                    Err(self.error(
                        ErrorKind::NumericOverflow,
                        "number literal is too large to represent",
                        expr.span,
                    ))
                }
            }
            ExprKind::Negate(inner) => {
                self.tick(expr.span)?;
                Ok(-self.eval_expr(inner)?)
            }
            ExprKind::Group(inner) => {
                self.tick(expr.span)?;
                self.eval_expr(inner)
            }
        }
    }

    /// Evaluate a run of binary nodes along the left spine, innermost first.
    fn eval_chain(&mut self, expr: &Expr) -> EvalResult<f64> {
        let mut pending = Vec::new();
        let mut node = expr;
        while let ExprKind::Binary { left, op, right } = &node.kind {
            pending.push((*op, right.as_ref(), node.span));
            node = left.as_ref();
        }

        let mut acc = self.eval_expr(node)?;
        for (op, right, span) in pending.into_iter().rev() {
            self.tick(span)?;
            let rhs = self.eval_expr(right)?;
            acc = self.apply(op, acc, rhs, span)?;
        }
        Ok(acc)
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn apply(&self, op: BinOp, lhs: f64, rhs: f64, span: Span) -> EvalResult<f64> {
        let result = match op {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => {
                if rhs == 0.0 {
                    return Err(self.error(ErrorKind::DivisionByZero, "division by zero", span));
                }
                lhs / rhs
            }
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(self.error(
                ErrorKind::NumericOverflow,
                format!("result of '{op}' is too large to represent"),
                span,
            ))
        }
    }
}
