//! arith parser: converts a token stream into an expression tree.

mod parse_expr;
mod parser;

pub use parser::{
    ParseResult, Parser, DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOKENS, MAX_DEPTH_CEILING,
    MAX_TOKENS_CEILING,
};
