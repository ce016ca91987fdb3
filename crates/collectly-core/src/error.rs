// ── Core error types ──
//
// Ordinary misses are never errors here: lookups return `None` and a
// removal that cannot find its target stops quietly. `CoreError` covers
// the conversions that cannot produce a value at all.

use serde_json::Value;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unresolvable predicate: expected a field name or a field map, got {kind}")]
    UnresolvablePredicate { kind: &'static str },

    #[error("Record must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("Invalid store option {option}: {reason}")]
    InvalidOption { option: String, reason: String },
}

/// Short name of a JSON value's type, for error messages and logs.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
