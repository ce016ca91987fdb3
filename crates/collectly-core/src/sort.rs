// ── Sorting ──
//
// A store's comparator is either a field name or a function. Field
// comparators go through a `FieldOrdering` provider; both kinds run as a
// stable sort, so records that compare equal keep their relative order.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::model::Record;

/// Record comparison function used as a comparator.
pub type CompareFn = Rc<dyn Fn(&Record, &Record) -> Ordering>;

// ── Comparator ──────────────────────────────────────────────────────

/// How a store orders its records after every `add`.
#[derive(Clone)]
pub enum Comparator {
    /// Sort by a field. A leading `-` sorts descending, a leading `+` is
    /// ignored. An empty field name leaves the order untouched.
    Field(String),
    /// Sort with an arbitrary comparison.
    Function(CompareFn),
}

impl Comparator {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn function(f: impl Fn(&Record, &Record) -> Ordering + 'static) -> Self {
        Self::Function(Rc::new(f))
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<&str> for Comparator {
    fn from(name: &str) -> Self {
        Self::field(name)
    }
}

impl From<String> for Comparator {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

/// A parsed field comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<'a> {
    pub field: &'a str,
    pub descending: bool,
}

impl<'a> SortKey<'a> {
    /// Parse `name`, `+name` or `-name`. Returns `None` for an empty field.
    pub fn parse(spec: &'a str) -> Option<Self> {
        let (field, descending) = match spec.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (spec.strip_prefix('+').unwrap_or(spec), false),
        };
        (!field.is_empty()).then_some(Self { field, descending })
    }
}

// ── Field ordering provider ─────────────────────────────────────────

/// Orders two field values. `None` means the record lacks the field.
pub trait FieldOrdering {
    fn compare(&self, left: Option<&Value>, right: Option<&Value>) -> Ordering;
}

/// Default field ordering.
///
/// Values of the same JSON type compare naturally: numbers numerically,
/// strings case-insensitively, `false` before `true`. Values of different
/// types order by type: missing and `null` first, then booleans, numbers,
/// strings, arrays, objects. Arrays and objects never reorder among
/// themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl NaturalOrder {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }
}

impl FieldOrdering for NaturalOrder {
    fn compare(&self, left: Option<&Value>, right: Option<&Value>) -> Ordering {
        match (left, right) {
            (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
            (Some(Value::Number(a)), Some(Value::Number(b))) => {
                match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                }
            }
            (Some(Value::String(a)), Some(Value::String(b))) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            _ => Self::rank(left).cmp(&Self::rank(right)),
        }
    }
}
