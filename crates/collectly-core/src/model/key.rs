// ── Identity keys ──
//
// RecordKey is the normalized form of an identity value. Every index
// lookup goes through it, so `1` and `"1"` address the same record.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

use super::record::{Fields, Record};

// ── RecordKey ───────────────────────────────────────────────────────

/// Canonical index key for a record's identity value.
///
/// Strings are kept verbatim. Numbers use their shortest decimal form, so
/// `1` and `1.0` share a key. Booleans and structured values use their
/// JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self(s.clone()),
            Value::Number(n) => Self(number_text(n)),
            other => Self(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── Truthiness ──────────────────────────────────────────────────────

/// Whether an identity value counts as present.
///
/// `null`, `false`, `0` and `""` are falsy. A record whose identity field
/// holds one of them is treated as having no identity at all.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64 Display drops an integral fraction: 1.0 prints as "1".
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}

// ── Value equality ──────────────────────────────────────────────────

/// JSON equality with numbers compared by value, so `2` equals `2.0`.
/// Arrays and objects compare element by element.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y) == Some(std::cmp::Ordering::Equal),
        _ => false,
    }
}

// ── IdentityLookup ──────────────────────────────────────────────────

/// Anything that can name a stored record: a record exposing the identity
/// field, or a raw identity value.
pub trait IdentityLookup {
    /// Resolve the index key, or `None` when nothing can be looked up.
    fn lookup_key(&self, id_attribute: &str) -> Option<RecordKey>;
}

impl IdentityLookup for Fields {
    fn lookup_key(&self, id_attribute: &str) -> Option<RecordKey> {
        self.get(id_attribute)
            .filter(|v| is_truthy(v))
            .map(RecordKey::from_value)
    }
}

impl IdentityLookup for Record {
    fn lookup_key(&self, id_attribute: &str) -> Option<RecordKey> {
        self.fields().lookup_key(id_attribute)
    }
}

impl IdentityLookup for Value {
    fn lookup_key(&self, id_attribute: &str) -> Option<RecordKey> {
        match self {
            Value::Null => None,
            Value::Object(map) => map.lookup_key(id_attribute),
            other => Some(RecordKey::from_value(other)),
        }
    }
}

impl IdentityLookup for RecordKey {
    fn lookup_key(&self, _id_attribute: &str) -> Option<RecordKey> {
        Some(self.clone())
    }
}

impl IdentityLookup for str {
    fn lookup_key(&self, _id_attribute: &str) -> Option<RecordKey> {
        Some(RecordKey::from(self))
    }
}

impl IdentityLookup for String {
    fn lookup_key(&self, id_attribute: &str) -> Option<RecordKey> {
        self.as_str().lookup_key(id_attribute)
    }
}

impl IdentityLookup for i64 {
    fn lookup_key(&self, _id_attribute: &str) -> Option<RecordKey> {
        Some(RecordKey(self.to_string()))
    }
}

impl IdentityLookup for u64 {
    fn lookup_key(&self, _id_attribute: &str) -> Option<RecordKey> {
        Some(RecordKey(self.to_string()))
    }
}

impl<T: IdentityLookup + ?Sized> IdentityLookup for &T {
    fn lookup_key(&self, id_attribute: &str) -> Option<RecordKey> {
        (**self).lookup_key(id_attribute)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_share_a_key() {
        assert_eq!(RecordKey::from_value(&json!(1)), RecordKey::from_value(&json!("1")));
    }

    #[test]
    fn integral_floats_key_like_integers() {
        assert_eq!(RecordKey::from_value(&json!(1.0)), RecordKey::from_value(&json!(1)));
        assert_eq!(RecordKey::from_value(&json!(1.0)).as_str(), "1");
        assert_eq!(RecordKey::from_value(&json!(2.5)).as_str(), "2.5");
        assert_eq!(RecordKey::from_value(&json!(u64::MAX)).as_str(), u64::MAX.to_string());
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&json!(2), &json!(2.0)));
        assert!(!values_equal(&json!(2), &json!(2.5)));
        assert!(!values_equal(&json!(2), &json!("2")));
        assert!(values_equal(&json!({"a": [1, {"b": 3.0}]}), &json!({"a": [1.0, {"b": 3}]})));
        assert!(!values_equal(&json!([1, 2]), &json!([1])));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn record_key_display() {
        let key: RecordKey = "abc".parse().unwrap();
        assert_eq!(key.to_string(), "abc");
    }

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(7), json!("x"), json!([]), json!({})] {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn lookup_from_record_uses_identity_field() {
        let fields = json!({"uid": "u-1", "id": "ignored"});
        assert_eq!(fields.lookup_key("uid"), Some(RecordKey::from("u-1")));
    }

    #[test]
    fn lookup_from_record_without_identity_is_none() {
        assert_eq!(json!({"id": 0}).lookup_key("id"), None);
        assert_eq!(json!({"name": "x"}).lookup_key("id"), None);
        assert_eq!(Value::Null.lookup_key("id"), None);
    }

    #[test]
    fn lookup_from_raw_value() {
        assert_eq!(json!(42).lookup_key("id"), Some(RecordKey::from("42")));
        assert_eq!(42_i64.lookup_key("id"), Some(RecordKey::from("42")));
        assert_eq!("a".lookup_key("id"), Some(RecordKey::from("a")));
    }
}
