//! Pipeline orchestration: lex → parse → evaluate → narrow.
//!
//! Errors surface in stage order: lexing errors first, then balance and
//! grammar errors, then runtime errors. Each stage stops the pipeline.

use arith_lexer::{Lexer, Token};
use arith_parser::Parser;
use arith_types::ast::Expr;
use arith_types::{Diagnostics, ErrorKind, EvalError, SourceFile, Span};
use serde::{Deserialize, Serialize};

use crate::evaluator::Evaluator;
use crate::limits::Limits;
use crate::number::Number;

/// Name given to expression text that does not come from a file.
pub const SOURCE_NAME: &str = "<expr>";

/// Evaluate an arithmetic expression with default limits.
///
/// ```
/// use arith_eval::{evaluate, ErrorKind, Number};
///
/// assert_eq!(evaluate("2 + 3 * 4"), Ok(Number::Integer(14)));
/// assert_eq!(evaluate("10/4"), Ok(Number::Real(2.5)));
/// assert_eq!(evaluate("5/0").unwrap_err().kind, ErrorKind::DivisionByZero);
/// ```
pub fn evaluate(text: &str) -> Result<Number, EvalError> {
    evaluate_with(text, &Limits::default())
}

/// Evaluate with explicit limits.
pub fn evaluate_with(text: &str, limits: &Limits) -> Result<Number, EvalError> {
    let source = SourceFile::new(SOURCE_NAME, text);
    evaluate_source(&source, limits)
}

/// Evaluate the text of `source`; errors carry its name.
pub fn evaluate_source(source: &SourceFile, limits: &Limits) -> Result<Number, EvalError> {
    run(source, limits).map_err(|diags| {
        diags
            .into_first()
            .unwrap_or_else(|| unparsed_error(source))
    })
}

/// Report every problem found in `text` instead of stopping at the first.
///
/// All lexing errors (up to [`arith_types::MAX_ERRORS`]) are collected; if
/// lexing succeeds, the first parse or runtime error is reported.
pub fn check(text: &str) -> Diagnostics {
    let source = SourceFile::new(SOURCE_NAME, text);
    match run(&source, &Limits::default()) {
        Ok(_) => Diagnostics::empty(),
        Err(diags) => diags,
    }
}

/// Serializable outcome of one evaluation, for callers that speak JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub success: bool,
    /// The narrowed value, `null` on failure.
    pub value: Option<Number>,
    /// `value` rendered for display.
    pub display: Option<String>,
    pub errors: Diagnostics,
}

/// Evaluate `text` and package the outcome as an [`EvalReport`].
pub fn evaluate_to_report(text: &str, limits: &Limits) -> EvalReport {
    let source = SourceFile::new(SOURCE_NAME, text);
    match run(&source, limits) {
        Ok(value) => EvalReport {
            success: true,
            value: Some(value),
            display: Some(value.to_string()),
            errors: Diagnostics::empty(),
        },
        Err(errors) => EvalReport {
            success: false,
            value: None,
            display: None,
            errors,
        },
    }
}

fn run(source: &SourceFile, limits: &Limits) -> Result<Number, Diagnostics> {
    let limits = &limits.clamped();
    let lexed = Lexer::new(source).lex();
    if lexed.errors.has_errors() {
        return Err(lexed.errors);
    }

    let token_count = lexed.tokens.len() as u64;
    let expr = parse(source, lexed.tokens, limits)?;

    let step_limit = limits.step_limit.unwrap_or(token_count);
    let value = Evaluator::new(source)
        .with_step_limit(step_limit)
        .eval_expr(&expr)?;
    Ok(Number::from_f64(value))
}

fn parse(
    source: &SourceFile,
    tokens: Vec<Token>,
    limits: &Limits,
) -> Result<Expr, Diagnostics> {
    let parsed = Parser::new(tokens, source)
        .with_max_depth(limits.max_depth)
        .with_max_tokens(limits.max_tokens)
        .parse();
    if parsed.errors.has_errors() {
        return Err(parsed.errors);
    }
    parsed.expr.ok_or_else(|| unparsed_error(source).into())
}

/// Fallback for a parser that produced neither a tree nor an error.
fn unparsed_error(source: &SourceFile) -> EvalError {
    EvalError::at(
        source,
        ErrorKind::MalformedExpression,
        "expression could not be parsed",
        Span::point(1, 1),
    )
}
