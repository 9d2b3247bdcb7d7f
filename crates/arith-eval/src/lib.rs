//! arith evaluator: turns an infix arithmetic string into a number.
//!
//! ```text
//! text → Lexer → Parser → Evaluator → Number
//! ```
//!
//! [`evaluate`] is the whole public surface most callers need. It is pure:
//! no state survives a call, so it is safe to call from many threads at once.

mod evaluator;
mod limits;
mod number;
mod pipeline;

pub use arith_parser::{MAX_DEPTH_CEILING, MAX_TOKENS_CEILING};
pub use arith_types::{Diagnostics, ErrorKind, EvalError};
pub use evaluator::{EvalResult, Evaluator};
pub use limits::Limits;
pub use number::Number;
pub use pipeline::{
    check, evaluate, evaluate_source, evaluate_to_report, evaluate_with, EvalReport, SOURCE_NAME,
};
