use crate::{SourceFile, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors stored before further ones are only counted.
pub const MAX_ERRORS: usize = 20;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Arithmetic,
    Limit,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Arithmetic => write!(f, "arithmetic"),
            Self::Limit => write!(f, "limit"),
        }
    }
}

/// Numeric error code (E100–E399).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const INVALID_CHARACTER: Self = Self(100);
    pub const UNBALANCED_PARENTHESES: Self = Self(101);
    pub const MALFORMED_EXPRESSION: Self = Self(102);

    // ── Arithmetic errors (E200–E299) ──
    pub const DIVISION_BY_ZERO: Self = Self(200);
    pub const NUMERIC_OVERFLOW: Self = Self(201);

    // ── Limit errors (E300–E399) ──
    pub const NESTING_TOO_DEEP: Self = Self(300);
    pub const EXPRESSION_TOO_LONG: Self = Self(301);
    pub const STEP_LIMIT_EXCEEDED: Self = Self(302);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            200..=299 => ErrorCategory::Arithmetic,
            300..=399 => ErrorCategory::Limit,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A character outside digits, `.`, `+ - * /`, parentheses and whitespace.
    InvalidCharacter,
    /// A `)` without an open group, or a `(` that is never closed.
    UnbalancedParentheses,
    /// Operator adjacency, missing operands, empty groups, trailing text.
    MalformedExpression,
    /// Right operand of `/` is zero.
    DivisionByZero,
    /// A literal or intermediate result is not finite.
    NumericOverflow,
    /// Parentheses nested deeper than the configured limit.
    NestingTooDeep,
    /// More tokens than the configured limit.
    ExpressionTooLong,
    /// Evaluation step budget exhausted. Indicates an internal fault.
    StepLimitExceeded,
}

impl ErrorKind {
    /// The stable numeric code for this kind.
    pub fn code(self) -> ErrorCode {
        match self {
            Self::InvalidCharacter => ErrorCode::INVALID_CHARACTER,
            Self::UnbalancedParentheses => ErrorCode::UNBALANCED_PARENTHESES,
            Self::MalformedExpression => ErrorCode::MALFORMED_EXPRESSION,
            Self::DivisionByZero => ErrorCode::DIVISION_BY_ZERO,
            Self::NumericOverflow => ErrorCode::NUMERIC_OVERFLOW,
            Self::NestingTooDeep => ErrorCode::NESTING_TOO_DEEP,
            Self::ExpressionTooLong => ErrorCode::EXPRESSION_TOO_LONG,
            Self::StepLimitExceeded => ErrorCode::STEP_LIMIT_EXCEEDED,
        }
    }
}

/// A structured evaluation error.
///
/// Callers render these; they should not parse the message text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{span}: {code} [{category}] {message}")]
pub struct EvalError {
    /// Source name (`<expr>` for interactive input).
    pub file: String,
    pub kind: ErrorKind,
    /// Error code (e.g., E200).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The exact source line for context.
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggestion: Option<String>,
}

impl EvalError {
    /// Create a new error.
    pub fn new(
        file: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        let code = kind.code();
        Self {
            file: file.into(),
            kind,
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Create an error located in `source`, copying the offending line.
    pub fn at(source: &SourceFile, kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        let line = source.line(span.start_line).unwrap_or("");
        Self::new(&source.name, kind, message, span, line)
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Errors collected by one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<EvalError>,
    pub total_errors: usize,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Returns `true` once no further errors will be stored.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push(&mut self, error: EvalError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// The earliest reported error, if any.
    pub fn first(&self) -> Option<&EvalError> {
        self.errors.first()
    }

    /// Consume the collection, keeping only the earliest error.
    pub fn into_first(self) -> Option<EvalError> {
        self.errors.into_iter().next()
    }
}

impl From<EvalError> for Diagnostics {
    fn from(err: EvalError) -> Self {
        let mut diags = Self::empty();
        diags.push(err);
        diags
    }
}
