// ── Chain mode ──
//
// Once `chain()` has been called on a collection, every operation that
// would hand back a derived list wraps it in a fresh, already-chained
// collection of the same type instead.

use crate::extend::Collection;
use crate::model::Record;

/// Result of an operation that honors chain mode.
#[derive(Debug)]
pub enum Chained<T, C> {
    /// Chain mode off: the plain result.
    Value(T),
    /// Chain mode on: the result wrapped in a new chained collection.
    Wrapped(C),
}

impl<T, C> Chained<T, C> {
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Wrapped(_) => None,
        }
    }

    pub fn wrapped(self) -> Option<C> {
        match self {
            Self::Wrapped(c) => Some(c),
            Self::Value(_) => None,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(_))
    }
}

/// Route a derived result through the collection's chain flag.
///
/// The wrapping collection inherits the source's options, so custom
/// identity fields stay intact on shared records.
pub(crate) fn wrap<C, T>(
    collection: &C,
    value: T,
    into_records: impl FnOnce(T) -> Vec<Record>,
) -> Chained<T, C>
where
    C: Collection,
{
    if !collection.is_chained() {
        return Chained::Value(value);
    }

    let options = collection.store().options().clone();
    let mut wrapped = C::get_instance(into_records(value), options);
    wrapped.chain();
    Chained::Wrapped(wrapped)
}
