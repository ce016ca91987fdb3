// ── Collection trait ──
//
// Every collection operation lives here as a default method over the
// three required accessors. `Store` implements the trait as-is; a
// specialized collection wraps a `Store`, implements the accessors, and
// overrides whichever operations it needs. Operations call each other
// through `self`, so an overridden `add` is also what `update`,
// `get_instance` and chain wrapping use.

use serde_json::Value;

use crate::chain::{self, Chained};
use crate::error::CoreError;
use crate::model::{Fields, IdentityLookup, IntoRecords, Record};
use crate::query::{FilterComparator, FilterExpression, Predicate};
use crate::store::{AddOptions, Store, StoreOptions};

/// An indexed, ordered record collection.
///
/// # Extending
///
/// ```
/// use collectly_core::{Collection, IntoRecords, Store};
///
/// /// Drops records without an email before they reach the store.
/// struct Contacts(Store);
///
/// impl Collection for Contacts {
///     fn from_store(store: Store) -> Self {
///         Self(store)
///     }
///     fn store(&self) -> &Store {
///         &self.0
///     }
///     fn store_mut(&mut self) -> &mut Store {
///         &mut self.0
///     }
///
///     fn add(&mut self, records: impl IntoRecords) -> &mut Self {
///         let valid: Vec<_> = records
///             .into_records()
///             .into_iter()
///             .filter(|r| r.contains("email"))
///             .collect();
///         self.add_with(valid, Default::default())
///     }
/// }
///
/// let contacts = Contacts::get_instance(
///     serde_json::json!([{"email": "a@example.com"}, {"name": "anon"}]),
///     Default::default(),
/// );
/// assert_eq!(contacts.size(), 1);
/// ```
pub trait Collection: Sized {
    // ── Required ─────────────────────────────────────────────────────

    /// Build the collection around a fresh store.
    fn from_store(store: Store) -> Self;

    fn store(&self) -> &Store;

    fn store_mut(&mut self) -> &mut Store;

    // ── Construction ─────────────────────────────────────────────────

    /// Hook run by [`get_instance`](Self::get_instance) before the initial
    /// records are added.
    fn initialize(&mut self) {}

    /// Construct a collection of this type and seed it with `records`.
    fn get_instance(records: impl IntoRecords, options: StoreOptions) -> Self {
        let mut collection = Self::from_store(Store::with_options(options));
        collection.initialize();
        collection.add(records);
        collection
    }

    /// New collection of the same type with the same options, sharing the
    /// current record handles. Never chained.
    fn clone_collection(&self) -> Self {
        Self::get_instance(self.all(), self.store().options().clone())
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Add one record or many. Records with a known identity are merged
    /// into the stored record in place; the rest are appended. Resorts
    /// afterwards when a comparator is configured.
    fn add(&mut self, records: impl IntoRecords) -> &mut Self {
        self.add_with(records, AddOptions::default())
    }

    fn add_with(&mut self, records: impl IntoRecords, options: AddOptions) -> &mut Self {
        self.store_mut().insert_batch(records.into_records());
        if options.sort && self.store().comparator().is_some() {
            self.sort();
        }
        self
    }

    /// Merge into the matching record, or add when there is none.
    fn update(&mut self, record: impl Into<Record>) -> &mut Self {
        let record = record.into();
        if !self.store().merge_existing(&record) {
            self.add(record);
        }
        self
    }

    /// Remove records by handle identity. The batch stops at the first
    /// record that is not in the collection.
    fn remove(&mut self, records: impl IntoRecords) -> &mut Self {
        self.store_mut().remove_batch(&records.into_records());
        self
    }

    fn remove_all(&mut self) -> &mut Self {
        let snapshot = self.store().records();
        self.remove(snapshot)
    }

    /// Remove every record matching `predicate`. Chain mode does not apply.
    fn remove_where(&mut self, predicate: impl Into<Predicate>) -> &mut Self {
        let matches = self.store().find_all(&predicate.into());
        self.remove(matches)
    }

    /// [`remove_where`](Self::remove_where) with a dynamic expression.
    fn remove_where_expr(
        &mut self,
        expr: &Value,
        value: Option<Value>,
    ) -> Result<&mut Self, CoreError> {
        let predicate = Predicate::resolve(expr, value)?;
        Ok(self.remove_where(predicate))
    }

    fn sort(&mut self) -> &mut Self {
        self.store_mut().sort_records();
        self
    }

    /// Turn on chain mode for good.
    fn chain(&mut self) -> &mut Self {
        self.store_mut().set_chaining();
        self
    }

    fn is_chained(&self) -> bool {
        self.store().chaining()
    }

    // ── Lookup & queries ─────────────────────────────────────────────

    /// Live handle to the record with this identity. Accepts a record or a
    /// raw identity value.
    fn get(&self, id: &(impl IdentityLookup + ?Sized)) -> Option<Record> {
        self.store().lookup(id)
    }

    /// First record matching `predicate`.
    fn find(&self, predicate: impl Into<Predicate>) -> Chained<Option<Record>, Self> {
        let found = self.store().find_first(&predicate.into());
        chain::wrap(self, found, |found| found.into_iter().collect())
    }

    /// Every record matching `predicate`, in sequence order.
    fn where_(&self, predicate: impl Into<Predicate>) -> Chained<Vec<Record>, Self> {
        let found = self.store().find_all(&predicate.into());
        chain::wrap(self, found, |found| found)
    }

    /// [`find`](Self::find) with a dynamic expression: a field name
    /// compared against `value`, or a field map. Other shapes fail without
    /// scanning.
    fn find_expr(
        &self,
        expr: &Value,
        value: Option<Value>,
    ) -> Result<Chained<Option<Record>, Self>, CoreError> {
        Ok(self.find(Predicate::resolve(expr, value)?))
    }

    /// [`where_`](Self::where_) with a dynamic expression.
    fn where_expr(
        &self,
        expr: &Value,
        value: Option<Value>,
    ) -> Result<Chained<Vec<Record>, Self>, CoreError> {
        Ok(self.where_(Predicate::resolve(expr, value)?))
    }

    /// Hand the whole sequence to the configured matcher.
    fn filter(
        &self,
        expression: impl Into<FilterExpression>,
        comparator: &FilterComparator,
    ) -> Chained<Vec<Record>, Self> {
        let found = self.store().filter_with(&expression.into(), comparator);
        chain::wrap(self, found, |found| found)
    }

    // ── Access ───────────────────────────────────────────────────────

    fn last(&self) -> Option<Record> {
        self.store().last_record()
    }

    fn at(&self, index: usize) -> Option<Record> {
        self.store().record_at(index)
    }

    fn size(&self) -> usize {
        self.store().len()
    }

    /// Live handles to every record, in sequence order.
    fn all(&self) -> Vec<Record> {
        self.store().records()
    }

    /// Deep copies of every record.
    fn to_json(&self) -> Chained<Vec<Fields>, Self> {
        chain::wrap(self, self.store().detach_all(), |copies| {
            copies.into_iter().map(Record::new).collect()
        })
    }

    // ── Transforms ───────────────────────────────────────────────────

    fn each(&self, mut f: impl FnMut(&Record, usize)) {
        for (index, record) in self.store().iter().enumerate() {
            f(record, index);
        }
    }

    /// Map every record to a JSON value. Chained, object results become
    /// records and any other value is stored under a `"value"` field.
    fn map(&self, mut f: impl FnMut(&Record, usize) -> Value) -> Chained<Vec<Value>, Self> {
        let mapped = self
            .store()
            .iter()
            .enumerate()
            .map(|(index, record)| f(record, index))
            .collect();
        chain::wrap(self, mapped, |values: Vec<Value>| {
            values
                .into_iter()
                .map(|value| match value {
                    Value::Object(fields) => Record::new(fields),
                    other => projection("value", other),
                })
                .collect()
        })
    }

    /// The value of `field` on every record, `null` where missing. Chained,
    /// each value becomes a single-field record.
    fn pluck(&self, field: &str) -> Chained<Vec<Value>, Self> {
        let plucked = self
            .store()
            .iter()
            .map(|record| record.get(field).unwrap_or(Value::Null))
            .collect();
        chain::wrap(self, plucked, |values: Vec<Value>| {
            values.into_iter().map(|v| projection(field, v)).collect()
        })
    }

    /// Array-style slice of the sequence; never wrapped.
    fn slice(&self, begin: isize, end: Option<isize>) -> Vec<Record> {
        self.store().slice(begin, end)
    }
}

impl Collection for Store {
    fn from_store(store: Store) -> Self {
        store
    }

    fn store(&self) -> &Store {
        self
    }

    fn store_mut(&mut self) -> &mut Store {
        self
    }
}

/// Single-field record `{field: value}`.
fn projection(field: &str, value: Value) -> Record {
    let mut fields = Fields::new();
    fields.insert(field.to_owned(), value);
    Record::new(fields)
}
