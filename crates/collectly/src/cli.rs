//! Clap derive structures for the `collectly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use strum::{Display, EnumString};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// collectly -- query JSON record collections
#[derive(Debug, Parser)]
#[command(
    name = "collectly",
    version,
    about = "Load a JSON array of records into an indexed collection and query it",
    long_about = "Load a JSON array of records into an indexed collection and query it.\n\n\
        Records are keyed by an identity field (default \"id\"). Records that\n\
        share an identity are merged; records without one get a random UUID.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// JSON file with an array of records (stdin when omitted or "-")
    #[arg(long, short = 'i', global = true, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Field holding each record's identity (overrides config)
    #[arg(long, global = true, value_name = "FIELD")]
    pub id_attribute: Option<String>,

    /// Keep records sorted by FIELD; prefix with '-' for descending
    #[arg(long, short = 's', global = true, value_name = "FIELD", allow_hyphen_values = true)]
    pub sort_by: Option<String>,

    /// Output format (overrides config)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Format ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every record in collection order
    #[command(alias = "ls")]
    List,

    /// Show the record with the given identity
    Get(GetArgs),

    /// Records whose fields equal the given values
    Where(MatchArgs),

    /// First record whose fields equal the given values
    Find(MatchArgs),

    /// Free-text or field-pattern search across records
    Filter(FilterArgs),

    /// One field's value from every record
    Pluck(PluckArgs),

    /// Number of records in the collection
    Count,

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Query args ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Identity value (parsed as JSON when possible)
    pub id: String,
}

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Field name to compare
    #[arg(required_unless_present = "matches", conflicts_with = "matches")]
    pub field: Option<String>,

    /// Expected value (parsed as JSON when possible); omit to match records
    /// that lack the field
    #[arg(requires = "field", allow_hyphen_values = true)]
    pub value: Option<String>,

    /// JSON object of fields that must all match
    #[arg(long = "match", short = 'm', value_name = "JSON")]
    pub matches: Option<String>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Text to look for in any field; prefix with '!' to negate
    #[arg(required_unless_present = "matches", conflicts_with = "matches", allow_hyphen_values = true)]
    pub text: Option<String>,

    /// JSON object of field patterns; the key "$" matches any field
    #[arg(long = "match", short = 'm', value_name = "JSON")]
    pub matches: Option<String>,

    /// Require whole-value equality instead of case-insensitive substrings
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct PluckArgs {
    /// Field to extract
    pub field: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
