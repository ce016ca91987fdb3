//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use collectly_config::ConfigError;
use collectly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const INPUT: i32 = 10;
    pub const CONFIG: i32 = 11;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Lookup ───────────────────────────────────────────────────────

    #[error("no record matches {query}")]
    #[diagnostic(
        code(collectly::not_found),
        help("Run: collectly list to see the available records")
    )]
    NotFound { query: String },

    // ── Input ────────────────────────────────────────────────────────

    #[error("could not read records from {source_name}")]
    #[diagnostic(code(collectly::input_read))]
    InputRead {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name} is not valid JSON")]
    #[diagnostic(
        code(collectly::input_json),
        help("Input must be a JSON array of objects, or a single object.")
    )]
    InputJson {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{source_name} holds a JSON {kind}, expected an array or object")]
    #[diagnostic(
        code(collectly::input_shape),
        help("Wrap the records in a JSON array: [{{\"id\": 1}}, ...]")
    )]
    InputShape {
        source_name: String,
        kind: &'static str,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("invalid value for {field}: {reason}")]
    #[diagnostic(code(collectly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(collectly::config),
        help("Check the config file (collectly config path) and COLLECTLY_* variables.")
    )]
    Config(#[from] ConfigError),

    // ── Serialization ────────────────────────────────────────────────

    #[error("failed to render output: {0}")]
    #[diagnostic(code(collectly::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::InputRead { .. } | Self::InputJson { .. } | Self::InputShape { .. } => {
                exit_code::INPUT
            }
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) => exit_code::CONFIG,
            Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnresolvablePredicate { kind } => CliError::Validation {
                field: "--match".into(),
                reason: format!("expected a JSON object, got {kind}"),
            },
            CoreError::NotAnObject { kind } => CliError::Validation {
                field: "record".into(),
                reason: format!("expected a JSON object, got {kind}"),
            },
            CoreError::InvalidOption { option, reason } => CliError::Validation {
                field: format!("--{}", option.replace('_', "-")),
                reason,
            },
        }
    }
}
