// ── Record store ──
//
// Ordered, identity-indexed storage. A single `IndexMap` carries both the
// sequence (insertion order, rearranged by sort) and the identity index,
// so the two can never disagree about length or about which record object
// sits under a key.

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use super::options::StoreOptions;
use crate::model::{Fields, IdentityLookup, Record, RecordKey};
use crate::query::{FilterComparator, FilterExpression, Predicate};
use crate::sort::{Comparator, SortKey};

/// The base record collection.
///
/// Every method here is the stock behavior of the matching
/// [`Collection`](crate::Collection) operation. Specialized collections
/// reach it through [`Collection::store`](crate::Collection::store) when an
/// override needs the stock behavior.
///
/// Records handed out by the accessors are live handles into the store,
/// never copies.
pub struct Store {
    /// Identity key -> record, in sequence order.
    records: IndexMap<RecordKey, Record>,

    options: StoreOptions,

    /// Chain mode, see [`crate::chain`]. Never reset once set.
    chaining: bool,
}

impl Store {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            records: IndexMap::new(),
            options,
            chaining: false,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn id_attribute(&self) -> &str {
        &self.options.id_attribute
    }

    pub fn comparator(&self) -> Option<&Comparator> {
        self.options.comparator.as_ref()
    }

    /// Replace the comparator. Takes effect at the next sort.
    pub fn set_comparator(&mut self, comparator: Option<Comparator>) {
        self.options.comparator = comparator;
    }

    // ── Insertion ────────────────────────────────────────────────────

    /// Merge-or-insert each candidate, in order. Returns how many records
    /// were new. Does not sort.
    pub fn insert_batch(&mut self, candidates: Vec<Record>) -> usize {
        let mut inserted = 0;
        for candidate in candidates {
            let key = self.ensure_identity(&candidate);
            if let Some(existing) = self.records.get(&key) {
                existing.merge(&candidate);
                debug!(id = %key, "merged record into existing");
            } else {
                self.records.insert(key, candidate);
                inserted += 1;
            }
        }
        inserted
    }

    /// Give the candidate an identity if it lacks a truthy one, and return
    /// its index key. The identity is written into the candidate itself.
    fn ensure_identity(&self, candidate: &Record) -> RecordKey {
        let id_attribute = self.id_attribute();
        if let Some(key) = candidate.lookup_key(id_attribute) {
            return key;
        }

        let id = self.options.identity.assign();
        trace!(id = %id, field = id_attribute, "assigned identity");
        candidate.set(id_attribute, id.clone());
        RecordKey::from(id)
    }

    /// Merge `record` into the stored record sharing its identity.
    /// Returns `false` when there is none.
    pub fn merge_existing(&self, record: &Record) -> bool {
        match self.lookup(record) {
            Some(existing) => {
                existing.merge(record);
                true
            }
            None => false,
        }
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// The stored record with the given identity, if any.
    pub fn lookup(&self, id: &(impl IdentityLookup + ?Sized)) -> Option<Record> {
        let key = id.lookup_key(self.id_attribute())?;
        self.records.get(&key).cloned()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.records.keys()
    }

    // ── Removal ──────────────────────────────────────────────────────

    /// Remove each record found by handle identity, in order.
    ///
    /// Stops at the first record that is not in the store: later entries
    /// of the batch stay put even if present. Returns how many were removed.
    pub fn remove_batch(&mut self, records: &[Record]) -> usize {
        let mut removed = 0;
        for record in records {
            let Some(position) = self.position_of(record) else {
                debug!(
                    removed,
                    remaining = records.len() - removed,
                    "record not in store, abandoning removal batch"
                );
                break;
            };
            if let Some((key, _)) = self.records.shift_remove_index(position) {
                debug!(id = %key, "removed record");
                removed += 1;
            }
        }
        removed
    }

    fn position_of(&self, record: &Record) -> Option<usize> {
        self.records.values().position(|stored| stored.ptr_eq(record))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn find_first(&self, predicate: &Predicate) -> Option<Record> {
        self.records
            .values()
            .find(|record| predicate.matches(record))
            .cloned()
    }

    pub fn find_all(&self, predicate: &Predicate) -> Vec<Record> {
        self.records
            .values()
            .filter(|record| predicate.matches(record))
            .cloned()
            .collect()
    }

    /// Run the configured matcher over the whole sequence.
    pub fn filter_with(
        &self,
        expression: &FilterExpression,
        comparator: &FilterComparator,
    ) -> Vec<Record> {
        let records = self.records();
        self.options.matcher.filter(&records, expression, comparator)
    }

    // ── Sorting ──────────────────────────────────────────────────────

    /// Stable sort by the configured comparator. No comparator, or a
    /// field comparator with an empty name, leaves the order as is.
    pub fn sort_records(&mut self) {
        match &self.options.comparator {
            None => {}
            Some(Comparator::Field(spec)) => {
                let Some(SortKey { field, descending }) = SortKey::parse(spec) else {
                    return;
                };
                let sorter = &self.options.sorter;
                self.records.sort_by(|_, a, _, b| {
                    let ordering = sorter.compare(a.fields().get(field), b.fields().get(field));
                    if descending { ordering.reverse() } else { ordering }
                });
                debug!(field, descending, len = self.records.len(), "sorted records");
            }
            Some(Comparator::Function(compare)) => {
                self.records.sort_by(|_, a, _, b| compare(a, b));
                debug!(len = self.records.len(), "sorted records with comparator function");
            }
        }
    }

    // ── Access ───────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record_at(&self, index: usize) -> Option<Record> {
        self.records.get_index(index).map(|(_, record)| record.clone())
    }

    pub fn last_record(&self) -> Option<Record> {
        self.records.last().map(|(_, record)| record.clone())
    }

    /// Handles to every record, in sequence order.
    pub fn records(&self) -> Vec<Record> {
        self.records.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Deep copies of every record, in sequence order.
    pub fn detach_all(&self) -> Vec<Fields> {
        self.records.values().map(Record::detach).collect()
    }

    /// Array-style slice: negative offsets count from the end, and
    /// out-of-range bounds clamp. `end` of `None` means "to the end".
    pub fn slice(&self, begin: isize, end: Option<isize>) -> Vec<Record> {
        let len = self.records.len();
        let start = clamp_offset(begin, len);
        let stop = end.map_or(len, |end| clamp_offset(end, len));
        if start >= stop {
            return Vec::new();
        }
        self.records
            .values()
            .skip(start)
            .take(stop - start)
            .cloned()
            .collect()
    }

    // ── Chain flag ───────────────────────────────────────────────────

    pub fn chaining(&self) -> bool {
        self.chaining
    }

    pub fn set_chaining(&mut self) {
        self.chaining = true;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("options", &self.options)
            .field("chaining", &self.chaining)
            .field("records", &self.records.values().collect::<Vec<_>>())
            .finish()
    }
}

/// Serializes as a JSON array of records.
impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in self.records.values() {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

fn clamp_offset(offset: isize, len: usize) -> usize {
    match usize::try_from(offset) {
        Ok(forward) => forward.min(len),
        Err(_) => len.saturating_sub(offset.unsigned_abs()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    fn seeded(values: Vec<Value>) -> Store {
        let mut store = Store::new();
        store.insert_batch(values.into_iter().map(record).collect());
        store
    }

    fn names(store: &Store) -> Vec<String> {
        store
            .iter()
            .map(|r| r.get("name").and_then(|v| v.as_str().map(str::to_owned)).unwrap())
            .collect()
    }

    #[test]
    fn insert_batch_counts_new_records() {
        let mut store = Store::new();
        let inserted = store.insert_batch(vec![
            record(json!({"id": 1})),
            record(json!({"id": 2})),
            record(json!({"id": 1, "a": true})),
        ]);
        assert_eq!(inserted, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup(&json!(1)).unwrap().get("a"), Some(json!(true)));
    }

    #[test]
    fn insert_writes_assigned_identity_into_candidate() {
        let mut store = Store::new();
        let candidate = record(json!({"name": "x"}));
        store.insert_batch(vec![candidate.clone()]);

        let id = candidate.get("id").unwrap();
        assert!(store.lookup(&id).unwrap().ptr_eq(&candidate));
    }

    #[test]
    fn custom_id_attribute() {
        let mut store = Store::with_options(StoreOptions::new().with_id_attribute("uid"));
        store.insert_batch(vec![record(json!({"uid": "a", "id": 1}))]);
        assert!(store.lookup("a").is_some());
        assert!(store.lookup(&json!({"uid": "a"})).is_some());
        assert!(store.lookup(&json!(1)).is_none());
    }

    #[test]
    fn remove_batch_stops_at_first_missing() {
        let mut store = seeded(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
        let first = store.record_at(0).unwrap();
        let third = store.record_at(2).unwrap();
        let stranger = record(json!({"id": 2}));

        let removed = store.remove_batch(&[first, stranger, third]);
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 2);
        assert!(store.lookup(&json!(3)).is_some());
    }

    #[test]
    fn sort_by_field_descending() {
        let mut store = seeded(vec![
            json!({"id": 1, "name": "a"}),
            json!({"id": 2, "name": "c"}),
            json!({"id": 3, "name": "b"}),
        ]);
        store.set_comparator(Some(Comparator::field("-name")));
        store.sort_records();
        assert_eq!(names(&store), ["c", "b", "a"]);
    }

    #[test]
    fn sort_is_stable() {
        let mut store = seeded(vec![
            json!({"id": 1, "name": "first", "rank": 1}),
            json!({"id": 2, "name": "second", "rank": 0}),
            json!({"id": 3, "name": "third", "rank": 1}),
        ]);
        store.set_comparator(Some(Comparator::field("rank")));
        store.sort_records();
        assert_eq!(names(&store), ["second", "first", "third"]);
    }

    #[test]
    fn empty_field_comparator_is_inert() {
        let mut store = seeded(vec![json!({"id": 2, "name": "b"}), json!({"id": 1, "name": "a"})]);
        store.set_comparator(Some(Comparator::field("")));
        store.sort_records();
        assert_eq!(names(&store), ["b", "a"]);
    }

    #[test]
    fn slice_follows_array_semantics() {
        let store = seeded((1..=5).map(|i| json!({"id": i})).collect());
        let ids = |records: Vec<Record>| -> Vec<i64> {
            records.iter().map(|r| r.get("id").unwrap().as_i64().unwrap()).collect()
        };

        assert_eq!(ids(store.slice(1, Some(3))), [2, 3]);
        assert_eq!(ids(store.slice(-2, None)), [4, 5]);
        assert_eq!(ids(store.slice(0, Some(-3))), [1, 2]);
        assert_eq!(ids(store.slice(4, Some(2))), Vec::<i64>::new());
        assert_eq!(ids(store.slice(-10, Some(10))), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn serializes_as_array() {
        let store = seeded(vec![json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(serde_json::to_value(&store).unwrap(), json!([{"id": 1}, {"id": 2}]));
    }
}
