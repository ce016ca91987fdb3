// ── Expression matching for `filter` ──
//
// `filter` hands the whole sequence to a `Matcher`. The default
// `ExpressionMatcher` does loose, search-box style matching: a text
// expression looks for a case-insensitive substring in any field, nested
// values included; a field map narrows the search per field, with `$`
// standing for "any field".

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::predicate::MatchFn;
use crate::model::{Fields, Record, values_equal};

/// Value comparison closure: `(actual, expected) -> matched`.
pub type ValueCompareFn = Rc<dyn Fn(&Value, &Value) -> bool>;

const ANY_FIELD: &str = "$";

// ── Expression & comparator ─────────────────────────────────────────

/// What `filter` looks for.
#[derive(Clone)]
pub enum FilterExpression {
    /// Match any field. A leading `!` negates. Empty text matches all.
    Text(String),
    /// Match field by field. Key `$` matches against every field.
    Fields(Fields),
    Callable(MatchFn),
}

impl FilterExpression {
    pub fn callable(f: impl Fn(&Record) -> bool + 'static) -> Self {
        Self::Callable(Rc::new(f))
    }
}

impl fmt::Debug for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Fields(map) => f.debug_tuple("Fields").field(map).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl From<&str> for FilterExpression {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for FilterExpression {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Fields> for FilterExpression {
    fn from(map: Fields) -> Self {
        Self::Fields(map)
    }
}

impl From<Value> for FilterExpression {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Fields(map),
            Value::String(text) => Self::Text(text),
            Value::Null => Self::Text(String::new()),
            other => Self::Text(other.to_string()),
        }
    }
}

/// How `filter` compares a field value against the expected value.
#[derive(Clone, Default)]
pub enum FilterComparator {
    /// Case-insensitive substring match on the values' text.
    #[default]
    Substring,
    /// Exact JSON equality, with numbers compared by value.
    Strict,
    Custom(ValueCompareFn),
}

impl FilterComparator {
    pub fn custom(f: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }
}

impl fmt::Debug for FilterComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring => f.write_str("Substring"),
            Self::Strict => f.write_str("Strict"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ── Matcher provider ────────────────────────────────────────────────

/// Predicate-matching capability used by `filter`.
pub trait Matcher {
    fn filter(
        &self,
        records: &[Record],
        expression: &FilterExpression,
        comparator: &FilterComparator,
    ) -> Vec<Record>;
}

/// Default matcher. See the module docs for the matching rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionMatcher;

impl Matcher for ExpressionMatcher {
    fn filter(
        &self,
        records: &[Record],
        expression: &FilterExpression,
        comparator: &FilterComparator,
    ) -> Vec<Record> {
        records
            .iter()
            .filter(|record| matches_record(record, expression, comparator))
            .cloned()
            .collect()
    }
}

fn matches_record(
    record: &Record,
    expression: &FilterExpression,
    comparator: &FilterComparator,
) -> bool {
    match expression {
        FilterExpression::Callable(f) => f(record),
        FilterExpression::Text(text) if text.is_empty() => true,
        FilterExpression::Text(text) => {
            let expected = Value::String(text.clone());
            match_fields(&record.fields(), &expected, comparator, true)
        }
        FilterExpression::Fields(map) => {
            let expected = Value::Object(map.clone());
            match_fields(&record.fields(), &expected, comparator, false)
        }
    }
}

fn match_fields(
    actual: &Fields,
    expected: &Value,
    comparator: &FilterComparator,
    any_field: bool,
) -> bool {
    if let Some(expected) = negated(expected, comparator) {
        return !match_fields(actual, &expected, comparator, any_field);
    }

    match expected {
        Value::Object(wanted) => wanted.iter().all(|(key, want)| {
            if key == ANY_FIELD {
                match_fields(actual, want, comparator, true)
            } else {
                let value = actual.get(key).unwrap_or(&Value::Null);
                deep_match(value, want, comparator, false)
            }
        }),
        _ if any_field => actual
            .values()
            .any(|value| deep_match(value, expected, comparator, true)),
        _ => false,
    }
}

fn deep_match(
    actual: &Value,
    expected: &Value,
    comparator: &FilterComparator,
    any_field: bool,
) -> bool {
    if let Some(expected) = negated(expected, comparator) {
        return !deep_match(actual, &expected, comparator, any_field);
    }

    match actual {
        Value::Array(items) => items
            .iter()
            .any(|item| deep_match(item, expected, comparator, any_field)),
        Value::Object(fields) => match_fields(fields, expected, comparator, any_field),
        _ if expected.is_object() => false,
        _ => compare(actual, expected, comparator),
    }
}

/// `!text` negates the match, except under strict comparison.
fn negated(expected: &Value, comparator: &FilterComparator) -> Option<Value> {
    if matches!(comparator, FilterComparator::Strict) {
        return None;
    }
    expected
        .as_str()?
        .strip_prefix('!')
        .map(|rest| Value::String(rest.to_owned()))
}

fn compare(actual: &Value, expected: &Value, comparator: &FilterComparator) -> bool {
    match comparator {
        FilterComparator::Custom(f) => f(actual, expected),
        FilterComparator::Strict => values_equal(actual, expected),
        FilterComparator::Substring => {
            if actual.is_null() || expected.is_null() {
                return actual == expected;
            }
            text_of(actual)
                .to_lowercase()
                .contains(&text_of(expected).to_lowercase())
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
