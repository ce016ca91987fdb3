// ── Predicates ──
//
// `where` and `find` accept three shapes of predicate: a closure, a
// single field/value pair, or a map of fields that must all match. The
// shape is resolved once per call, before the scan starts.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{CoreError, json_kind};
use crate::model::{Fields, Record, values_equal};

/// Record predicate closure.
pub type MatchFn = Rc<dyn Fn(&Record) -> bool>;

/// A resolved query predicate.
///
/// Field comparisons are structural: nested arrays and objects match when
/// their contents match, and numbers match by value (`2` equals `2.0`).
#[derive(Clone)]
pub enum Predicate {
    Callable(MatchFn),
    /// The named field must equal `expected`. `None` matches records that
    /// lack the field.
    Field {
        name: String,
        expected: Option<Value>,
    },
    /// Every entry must equal the record's field of the same name. An
    /// empty map matches every record.
    FieldMap(Fields),
}

impl Predicate {
    pub fn callable(f: impl Fn(&Record) -> bool + 'static) -> Self {
        Self::Callable(Rc::new(f))
    }

    pub fn field(name: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self::Field {
            name: name.into(),
            expected: Some(expected.into()),
        }
    }

    pub fn fields(map: Fields) -> Self {
        Self::FieldMap(map)
    }

    /// Resolve a dynamic expression.
    ///
    /// A string names a field compared against `value`; an object is a
    /// field map and `value` is ignored. Anything else cannot be resolved.
    pub fn resolve(expr: &Value, value: Option<Value>) -> Result<Self, CoreError> {
        match expr {
            Value::String(name) => Ok(Self::Field {
                name: name.clone(),
                expected: value,
            }),
            Value::Object(map) => Ok(Self::FieldMap(map.clone())),
            other => Err(CoreError::UnresolvablePredicate {
                kind: json_kind(other),
            }),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Callable(f) => f(record),
            Self::Field { name, expected } => match (record.fields().get(name), expected) {
                (Some(actual), Some(expected)) => values_equal(actual, expected),
                (None, None) => true,
                _ => false,
            },
            Self::FieldMap(map) => {
                let fields = record.fields();
                map.iter()
                    .all(|(key, value)| fields.get(key).is_some_and(|v| values_equal(v, value)))
            }
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callable(_) => f.write_str("Callable(..)"),
            Self::Field { name, expected } => f
                .debug_struct("Field")
                .field("name", name)
                .field("expected", expected)
                .finish(),
            Self::FieldMap(map) => f.debug_tuple("FieldMap").field(map).finish(),
        }
    }
}

impl From<Fields> for Predicate {
    fn from(map: Fields) -> Self {
        Self::FieldMap(map)
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Predicate {
    fn from((name, expected): (K, V)) -> Self {
        Self::field(name, expected)
    }
}

impl TryFrom<Value> for Predicate {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::FieldMap(map)),
            other => Err(CoreError::UnresolvablePredicate {
                kind: json_kind(&other),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn field_map_requires_every_pair() {
        let p = Predicate::try_from(json!({"active": true, "role": "admin"})).unwrap();
        assert!(p.matches(&record(json!({"active": true, "role": "admin", "x": 1}))));
        assert!(!p.matches(&record(json!({"active": true, "role": "user"}))));
        assert!(!p.matches(&record(json!({"active": true}))));
    }

    #[test]
    fn empty_field_map_matches_all() {
        let p = Predicate::fields(Fields::new());
        assert!(p.matches(&record(json!({}))));
    }

    #[test]
    fn field_equality_is_strict_on_type() {
        let p = Predicate::field("id", 1);
        assert!(p.matches(&record(json!({"id": 1}))));
        assert!(!p.matches(&record(json!({"id": "1"}))));
    }

    #[test]
    fn integral_float_matches_integer() {
        let p = Predicate::field("n", json!(2.0));
        assert!(p.matches(&record(json!({"n": 2}))));

        let p = Predicate::try_from(json!({"n": 2})).unwrap();
        assert!(p.matches(&record(json!({"n": 2.0}))));
        assert!(!p.matches(&record(json!({"n": 2.5}))));
    }

    #[test]
    fn resolve_string_expression() {
        let p = Predicate::resolve(&json!("name"), Some(json!("x"))).unwrap();
        assert!(p.matches(&record(json!({"name": "x"}))));
    }

    #[test]
    fn resolve_string_without_value_matches_missing_field() {
        let p = Predicate::resolve(&json!("name"), None).unwrap();
        assert!(p.matches(&record(json!({"id": 1}))));
        assert!(!p.matches(&record(json!({"name": null}))));
    }

    #[test]
    fn resolve_rejects_other_shapes() {
        for expr in [json!(3), json!(null), json!([1]), json!(true)] {
            let err = Predicate::resolve(&expr, None).unwrap_err();
            assert!(matches!(err, CoreError::UnresolvablePredicate { .. }));
        }
    }

    #[test]
    fn callable_is_used_directly() {
        let p = Predicate::callable(|r| r.get("n").and_then(|v| v.as_i64()) > Some(2));
        assert!(p.matches(&record(json!({"n": 3}))));
        assert!(!p.matches(&record(json!({"n": 1}))));
    }

    #[test]
    fn nested_values_compare_structurally() {
        let p = Predicate::field("tags", json!(["a", "b"]));
        assert!(p.matches(&record(json!({"tags": ["a", "b"]}))));
    }
}
