//! Shared configuration for collectly tools.
//!
//! TOML file + environment layering via `figment`, and translation of the
//! `[store]` section into `collectly_core::StoreOptions`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use collectly_core::{CoreError, DEFAULT_ID_ATTRIBUTE, StoreOptions};

/// Environment prefix. Nested keys are separated by `__`, e.g.
/// `COLLECTLY_STORE__ID_ATTRIBUTE=uid`.
pub const ENV_PREFIX: &str = "COLLECTLY_";

/// Output formats the tools know how to render.
pub const OUTPUT_FORMATS: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<CoreError> for ConfigError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidOption { option, reason } => Self::Validation {
                field: format!("store.{option}"),
                reason,
            },
            other => Self::Validation {
                field: "store".into(),
                reason: other.to_string(),
            },
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// How stores are built.
    #[serde(default)]
    pub store: StoreSection,

    /// How results are rendered.
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreSection {
    /// Field holding each record's identity.
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,

    /// Field to keep records sorted by; `-field` for descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            id_attribute: default_id_attribute(),
            comparator: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputSection {
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_id_attribute() -> String {
    DEFAULT_ID_ATTRIBUTE.into()
}
fn default_format() -> String {
    "table".into()
}

impl Config {
    /// Validate the whole config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(ConfigError::Validation {
                field: "output.format".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    OUTPUT_FORMATS.join(", "),
                    self.output.format
                ),
            });
        }
        self.store_options().map(|_| ())
    }

    /// Translate the `[store]` section into store options.
    pub fn store_options(&self) -> Result<StoreOptions, ConfigError> {
        let mut options = StoreOptions::new().with_id_attribute(self.store.id_attribute.as_str());
        if let Some(ref comparator) = self.store.comparator {
            options = options.with_comparator(comparator.as_str());
        }
        options.validate()?;
        Ok(options)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "collectly", "collectly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("collectly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` + environment. A missing file is not an
/// error: defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use collectly_core::Comparator;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.store.id_attribute, "id");
        assert_eq!(cfg.output.format, "table");
    }

    #[test]
    fn store_options_carry_comparator() {
        let cfg = Config {
            store: StoreSection {
                id_attribute: "uid".into(),
                comparator: Some("-age".into()),
            },
            ..Config::default()
        };
        let options = cfg.store_options().unwrap();
        assert_eq!(options.id_attribute, "uid");
        assert!(matches!(options.comparator, Some(Comparator::Field(ref f)) if f == "-age"));
    }

    #[test]
    fn blank_id_attribute_is_rejected() {
        let cfg = Config {
            store: StoreSection {
                id_attribute: String::new(),
                comparator: None,
            },
            ..Config::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "store.id_attribute"));
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let cfg = Config {
            output: OutputSection {
                format: "xml".into(),
            },
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation { .. })));
    }
}
