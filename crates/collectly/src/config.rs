//! CLI configuration: thin wrapper around `collectly_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--id-attribute, --sort-by, --output).

use collectly_core::StoreOptions;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use collectly_config::{Config, config_path, load_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Effective settings for one invocation.
#[derive(Debug)]
pub struct Settings {
    pub options: StoreOptions,
    pub format: OutputFormat,
}

/// Merge global flags over the loaded config. Flags win.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Settings, CliError> {
    let mut options = cfg.store_options()?;
    if let Some(ref id_attribute) = global.id_attribute {
        options = options.with_id_attribute(id_attribute.as_str());
    }
    if let Some(ref sort_by) = global.sort_by {
        options = options.with_comparator(sort_by.as_str());
    }
    options.validate()?;

    let format = match global.output {
        Some(format) => format,
        None => cfg.output.format.parse::<OutputFormat>().map_err(|_| CliError::Validation {
            field: "output.format".into(),
            reason: format!("unknown format '{}'", cfg.output.format),
        })?,
    };

    Ok(Settings { options, format })
}
