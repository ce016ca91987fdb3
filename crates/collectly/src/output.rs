//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Records have no fixed
//! schema, so tables are assembled with `tabled`'s builder from the union of
//! field names in first-seen order. Structured formats use serde, plain emits
//! one value per line.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, builder::Builder, settings::Style};

use collectly_core::Record;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of records.
///
/// - `table`: one column per field seen across the records
/// - `json` / `json-compact` / `yaml`: the records as an array
/// - `plain`: each record's identity, one per line
pub fn render_records(
    format: OutputFormat,
    records: &[Record],
    id_attribute: &str,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(records_table(records)),
        OutputFormat::Plain => Ok(records
            .iter()
            .map(|r| cell(&r.get(id_attribute).unwrap_or(Value::Null)))
            .collect::<Vec<_>>()
            .join("\n")),
        structured => render_structured(structured, records),
    }
}

/// Render one record. The table form is a two-column field/value view.
pub fn render_record(
    format: OutputFormat,
    record: &Record,
    id_attribute: &str,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (name, value) in record.fields().iter() {
                builder.push_record([name.clone(), cell(value)]);
            }
            Ok(styled(builder.build()))
        }
        OutputFormat::Plain => Ok(cell(&record.get(id_attribute).unwrap_or(Value::Null))),
        structured => render_structured(structured, record),
    }
}

/// Render one field's values, as `pluck` produces them.
pub fn render_values(format: OutputFormat, field: &str, values: &[Value]) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record([field]);
            for value in values {
                builder.push_record([cell(value)]);
            }
            Ok(styled(builder.build()))
        }
        OutputFormat::Plain => Ok(values.iter().map(cell).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, values),
    }
}

/// Render any serializable value; table and plain fall back to `plain_fn`.
pub fn render_single<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => Ok(plain_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_structured<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(render_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(render_err)?,
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Plain => {
            serde_json::to_string_pretty(data).map_err(render_err)?
        }
    };
    Ok(rendered.trim_end().to_owned())
}

fn records_table(records: &[Record]) -> String {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for name in record.fields().keys() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());
    for record in records {
        let fields = record.fields();
        builder.push_record(
            columns
                .iter()
                .map(|name| fields.get(name).map(cell).unwrap_or_default()),
        );
    }
    styled(builder.build())
}

fn styled(mut table: Table) -> String {
    table.with(Style::rounded()).to_string()
}

/// Cell text: strings bare, null empty, anything else as JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_err(err: impl std::fmt::Display) -> CliError {
    CliError::Render(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            Record::try_from(json!({"id": 1, "name": "ada"})).unwrap(),
            Record::try_from(json!({"id": 2, "team": "web", "tags": ["a"]})).unwrap(),
        ]
    }

    #[test]
    fn table_columns_are_the_union_of_fields() {
        let out = render_records(OutputFormat::Table, &records(), "id").unwrap();
        let header = out.lines().nth(1).unwrap();
        assert!(header.contains("id") && header.contains("name") && header.contains("team"));
        assert!(out.contains(r#"["a"]"#));
    }

    #[test]
    fn plain_lists_identities() {
        let out = render_records(OutputFormat::Plain, &records(), "id").unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn compact_json_keeps_field_order() {
        let out = render_records(OutputFormat::JsonCompact, &records(), "id").unwrap();
        insta::assert_snapshot!(out, @r#"[{"id":1,"name":"ada"},{"id":2,"team":"web","tags":["a"]}]"#);
    }

    #[test]
    fn plucked_nulls_render_empty_in_plain() {
        let values = [json!("ada"), Value::Null, json!(3)];
        let out = render_values(OutputFormat::Plain, "name", &values).unwrap();
        assert_eq!(out, "ada\n\n3");
    }
}
