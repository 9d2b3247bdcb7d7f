//! Shared types for the arith evaluator.
//!
//! This crate defines the expression tree, source spans, error types,
//! and the diagnostic collection used across all pipeline stages.

mod error;
mod span;
pub mod ast;

pub use error::{Diagnostics, ErrorCategory, ErrorCode, ErrorKind, EvalError, MAX_ERRORS};
pub use span::{SourceFile, Span};
