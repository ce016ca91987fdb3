//! Query command handlers: where, find, filter, pluck.

use serde_json::Value;

use collectly_core::{Collection, FilterComparator, FilterExpression, Predicate, Store};

use crate::cli::{FilterArgs, GlobalOpts, MatchArgs, PluckArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

/// Build the predicate for `where` / `find` from either form of arguments.
fn predicate(args: &MatchArgs) -> Result<Predicate, CliError> {
    if let Some(ref raw) = args.matches {
        return Ok(Predicate::resolve(&util::parse_object(raw)?, None)?);
    }
    let field = args.field.as_deref().ok_or_else(|| CliError::Validation {
        field: "field".into(),
        reason: "give a field name or --match".into(),
    })?;
    let expected = args.value.as_deref().map(util::parse_value);
    Ok(Predicate::resolve(&Value::String(field.to_owned()), expected)?)
}

fn describe(args: &MatchArgs) -> String {
    match (&args.matches, &args.field, &args.value) {
        (Some(raw), _, _) => raw.clone(),
        (None, Some(field), Some(value)) => format!("{field} = {value}"),
        (None, Some(field), None) => format!("missing {field}"),
        (None, None, _) => String::new(),
    }
}

pub fn where_(
    store: &Store,
    args: &MatchArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let found = store.where_(predicate(args)?).value().unwrap_or_default();
    tracing::debug!(matched = found.len(), "where");

    let out = output::render_records(settings.format, &found, store.id_attribute())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn find(
    store: &Store,
    args: &MatchArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let record = store
        .find(predicate(args)?)
        .value()
        .flatten()
        .ok_or_else(|| CliError::NotFound {
            query: describe(args),
        })?;

    let out = output::render_record(settings.format, &record, store.id_attribute())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn filter(
    store: &Store,
    args: &FilterArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let expression = match (&args.matches, &args.text) {
        (Some(raw), _) => FilterExpression::from(util::parse_object(raw)?),
        (None, Some(text)) => FilterExpression::from(text.as_str()),
        (None, None) => {
            return Err(CliError::Validation {
                field: "text".into(),
                reason: "give search text or --match".into(),
            });
        }
    };
    let comparator = if args.strict {
        FilterComparator::Strict
    } else {
        FilterComparator::Substring
    };

    let found = store.filter(expression, &comparator).value().unwrap_or_default();
    tracing::debug!(matched = found.len(), strict = args.strict, "filter");

    let out = output::render_records(settings.format, &found, store.id_attribute())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn pluck(
    store: &Store,
    args: &PluckArgs,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let values = store.pluck(&args.field).value().unwrap_or_default();
    let out = output::render_values(settings.format, &args.field, &values)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
