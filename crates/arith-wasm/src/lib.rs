//! arith evaluator as a WASM module for browser environments.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { evaluate } from 'arith-wasm';
//!
//! await init();
//!
//! console.log(JSON.parse(evaluate("2 + 3 * 4")));
//! // { success: true, value: 14, display: "14", errors: { errors: [], total_errors: 0 } }
//! ```

use arith_eval::{evaluate_to_report, Limits};
use wasm_bindgen::prelude::*;

/// Evaluate an expression.
///
/// Returns a JSON string containing an `EvalReport`:
/// ```json
/// {
///   "success": true,
///   "value": 2.5,
///   "display": "2.5",
///   "errors": { "errors": [], "total_errors": 0 }
/// }
/// ```
///
/// On failure, `success` is `false`, `value` and `display` are `null`, and
/// `errors` holds the structured error.
#[wasm_bindgen]
pub fn evaluate(text: &str) -> String {
    let report = evaluate_to_report(text, &Limits::default());
    serde_json::to_string(&report).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"value":null,"display":null,"errors":{{"errors":[{{"message":"Serialization error: {}"}}],"total_errors":1}}}}"#,
            e
        )
    })
}

/// Report every problem in an expression without producing a value.
///
/// Returns a JSON string containing `Diagnostics`. Useful for live editor
/// feedback, where every invalid character should be marked at once.
#[wasm_bindgen]
pub fn check(text: &str) -> String {
    let diagnostics = arith_eval::check(text);
    serde_json::to_string(&diagnostics).unwrap_or_else(|e| {
        format!(
            r#"{{"errors":[{{"message":"Serialization error: {}"}}],"total_errors":1}}"#,
            e
        )
    })
}

/// Return the evaluator version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
