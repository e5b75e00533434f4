//! Value coercion applied when composing a search.

use serde_json::Value;

/// Whether an arity-0 condition should be applied.
///
/// Only boolean `true` and the exact strings `"true"` and `"1"` count. Everything
/// else, including `"TRUE"`, `1`, `"yes"` and `null`, leaves the scope out.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        _ => false,
    }
}

/// Null, or text that is empty once trimmed.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
