// ── Record handles ──
//
// A record is an open mapping of field names to JSON values behind a
// shared, interior-mutable handle. Stores hand out handles, never copies:
// a field written through one handle is visible through every other.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{CoreError, json_kind};

/// Field name → value mapping backing every record.
pub type Fields = Map<String, Value>;

// ── Record ──────────────────────────────────────────────────────────

/// Live handle to a record.
///
/// `Clone` copies the handle, not the fields. Two handles are the same
/// record when [`Record::ptr_eq`] holds; `remove` relies on exactly that.
/// Use [`Record::detach`] for an independent deep copy.
#[derive(Clone, Default)]
pub struct Record(Rc<RefCell<Fields>>);

impl Record {
    pub fn new(fields: Fields) -> Self {
        Self(Rc::new(RefCell::new(fields)))
    }

    /// Borrow the fields for reading.
    ///
    /// Panics if the record is currently borrowed mutably, like any
    /// `RefCell` borrow.
    pub fn fields(&self) -> Ref<'_, Fields> {
        self.0.borrow()
    }

    /// Borrow the fields for writing. Changes are visible through every handle.
    pub fn fields_mut(&self) -> RefMut<'_, Fields> {
        self.0.borrow_mut()
    }

    /// Clone out a single field value.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.0.borrow().get(field).cloned()
    }

    /// Set a field, returning the previous value.
    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.borrow_mut().insert(field.into(), value.into())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.borrow().contains_key(field)
    }

    /// Whether both handles point at the same record.
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Copy every field of `other` onto this record, overwriting and
    /// extending. Merging a record into itself is a no-op.
    pub fn merge(&self, other: &Record) {
        if self.ptr_eq(other) {
            return;
        }
        self.merge_fields(&other.fields());
    }

    pub fn merge_fields(&self, fields: &Fields) {
        let mut target = self.0.borrow_mut();
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }

    /// Deep copy of the fields, decoupled from the store.
    pub fn detach(&self) -> Fields {
        self.0.borrow().clone()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.detach())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(fields) => f.debug_tuple("Record").field(&*fields).finish(),
            Err(_) => f.write_str("Record(<borrowed>)"),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.borrow().serialize(serializer)
    }
}

impl From<Fields> for Record {
    fn from(fields: Fields) -> Self {
        Self::new(fields)
    }
}

impl TryFrom<Value> for Record {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(CoreError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }
}

// ── IntoRecords ─────────────────────────────────────────────────────

/// Input accepted by `add` and `remove`: a single record or a list of them.
///
/// `None` and JSON `null` mean "no records". JSON values that are not
/// objects cannot become records and are skipped.
pub trait IntoRecords {
    fn into_records(self) -> Vec<Record>;
}

impl IntoRecords for Record {
    fn into_records(self) -> Vec<Record> {
        vec![self]
    }
}

impl IntoRecords for &Record {
    fn into_records(self) -> Vec<Record> {
        vec![self.clone()]
    }
}

impl IntoRecords for Fields {
    fn into_records(self) -> Vec<Record> {
        vec![Record::new(self)]
    }
}

impl IntoRecords for Vec<Record> {
    fn into_records(self) -> Vec<Record> {
        self
    }
}

impl IntoRecords for &[Record] {
    fn into_records(self) -> Vec<Record> {
        self.to_vec()
    }
}

impl<const N: usize> IntoRecords for [Record; N] {
    fn into_records(self) -> Vec<Record> {
        self.into()
    }
}

impl IntoRecords for Vec<Fields> {
    fn into_records(self) -> Vec<Record> {
        self.into_iter().map(Record::new).collect()
    }
}

impl IntoRecords for Vec<Value> {
    fn into_records(self) -> Vec<Record> {
        self.into_iter().flat_map(IntoRecords::into_records).collect()
    }
}

impl IntoRecords for Value {
    fn into_records(self) -> Vec<Record> {
        match self {
            Value::Null => Vec::new(),
            Value::Object(fields) => vec![Record::new(fields)],
            Value::Array(items) => items.into_records(),
            other => {
                tracing::warn!(kind = json_kind(&other), "skipping non-object record");
                Vec::new()
            }
        }
    }
}

impl<T: IntoRecords> IntoRecords for Option<T> {
    fn into_records(self) -> Vec<Record> {
        self.map(IntoRecords::into_records).unwrap_or_default()
    }
}
