//! Whole-collection command handlers: list, get, count.

use collectly_core::{Collection, Store};

use crate::cli::{GetArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn list(store: &Store, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_records(settings.format, &store.all(), store.id_attribute())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn get(
    store: &Store,
    args: &GetArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let id = util::parse_value(&args.id);
    let record = store.get(&id).ok_or_else(|| CliError::NotFound {
        query: format!("{} {}", store.id_attribute(), args.id),
    })?;

    let out = output::render_record(settings.format, &record, store.id_attribute())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn count(store: &Store, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(settings.format, &store.size(), ToString::to_string)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
