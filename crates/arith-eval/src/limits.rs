//! Resource limits for one evaluation.

use arith_parser::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOKENS, MAX_DEPTH_CEILING, MAX_TOKENS_CEILING};
use serde::{Deserialize, Serialize};

/// Bounds applied while parsing and evaluating.
///
/// Missing fields take their defaults when deserialized, so `{}` is a valid
/// configuration. `max_depth` and `max_tokens` are clamped to
/// [`MAX_DEPTH_CEILING`] and [`MAX_TOKENS_CEILING`] when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum parenthesis nesting depth.
    pub max_depth: u32,
    /// Maximum number of tokens in the input.
    pub max_tokens: usize,
    /// Evaluation step budget. `None` derives it from the token count,
    /// which is always enough for a well-formed tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_limit: Option<u64>,
}

impl Limits {
    /// These limits with `max_depth` and `max_tokens` clamped to their
    /// ceilings.
    pub fn clamped(&self) -> Self {
        Self {
            max_depth: self.max_depth.min(MAX_DEPTH_CEILING),
            max_tokens: self.max_tokens.min(MAX_TOKENS_CEILING),
            step_limit: self.step_limit,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            step_limit: None,
        }
    }
}
