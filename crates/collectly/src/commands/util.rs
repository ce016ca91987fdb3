//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use collectly_core::{Collection, Store, StoreOptions, json_kind};

use crate::error::CliError;

/// Read the input document and build the collection from it.
///
/// A top-level array is a batch of records, a top-level object a single
/// record. Non-object array elements are skipped by the store.
pub fn load_store(input: Option<&Path>, options: StoreOptions) -> Result<Store, CliError> {
    let (source_name, raw) = read_input(input)?;
    let document: Value = serde_json::from_str(&raw).map_err(|source| CliError::InputJson {
        source_name: source_name.clone(),
        source,
    })?;

    match document {
        Value::Array(_) | Value::Object(_) => {
            let store = Store::get_instance(document, options);
            tracing::debug!(source = %source_name, records = store.size(), "collection loaded");
            Ok(store)
        }
        other => Err(CliError::InputShape {
            source_name,
            kind: json_kind(&other),
        }),
    }
}

fn read_input(input: Option<&Path>) -> Result<(String, String), CliError> {
    match input {
        Some(path) if path != Path::new("-") => {
            let name = path.display().to_string();
            let raw = std::fs::read_to_string(path).map_err(|source| CliError::InputRead {
                source_name: name.clone(),
                source,
            })?;
            Ok((name, raw))
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|source| CliError::InputRead {
                    source_name: "stdin".into(),
                    source,
                })?;
            Ok(("stdin".into(), raw))
        }
    }
}

/// Command-line values are JSON when they parse as JSON, strings otherwise:
/// `7` is a number, `true` a boolean, `ada` the string "ada".
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

/// Parse a `--match` argument, which must be a JSON object.
pub fn parse_object(raw: &str) -> Result<Value, CliError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => Err(CliError::Validation {
            field: "--match".into(),
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(CliError::Validation {
            field: "--match".into(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}
