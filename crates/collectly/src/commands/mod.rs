//! Command dispatch: bridges CLI args -> collection operations -> output.

pub mod config_cmd;
pub mod query;
pub mod records;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Load config and input, then dispatch a collection-bound command.
pub fn dispatch(cmd: &Command, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let settings = config::resolve(global, &cfg)?;
    tracing::debug!(
        format = %settings.format,
        id_attribute = %settings.options.id_attribute,
        "settings resolved"
    );
    let store = util::load_store(global.input.as_deref(), settings.options.clone())?;

    match cmd {
        Command::List => records::list(&store, &settings, global),
        Command::Get(args) => records::get(&store, args, &settings, global),
        Command::Count => records::count(&store, &settings, global),
        Command::Where(args) => query::where_(&store, args, &settings, global),
        Command::Find(args) => query::find(&store, args, &settings, global),
        Command::Filter(args) => query::filter(&store, args, &settings, global),
        Command::Pluck(args) => query::pluck(&store, args, &settings, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
