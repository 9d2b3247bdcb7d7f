//! Narrowed numeric results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the `i64` range as an exactly representable `f64`.
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
/// Exclusive upper bound of the `i64` range (2^63).
const I64_END_F64: f64 = 9_223_372_036_854_775_808.0;

/// The result of an evaluation.
///
/// All arithmetic happens in `f64`; the final value is narrowed to
/// `Integer` only when that loses nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    /// Narrow a float: `Integer` when finite, whole and within `i64`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && (I64_MIN_F64..I64_END_F64).contains(&value) {
            Number::Integer(value as i64)
        } else {
            Number::Real(value)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Real(r) => r,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Real(r) => write!(f, "{r}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
    }
}
