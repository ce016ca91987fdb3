//! In-memory indexed record collections.
//!
//! A collection keeps uniquely-identified JSON records in a stable order
//! and indexes them by identity:
//!
//! - **[`Store`]**: the base collection. Records live in a single
//!   `IndexMap`, which is both the ordered sequence and the identity
//!   index. Adding a record whose identity is already present merges its
//!   fields into the stored record in place; records without an identity
//!   get a random one ([`identity`]).
//!
//! - **[`Record`]**: a live, shared handle (`Rc<RefCell<_>>`). Everything
//!   `get`/`at`/`all` returns aliases the stored record, so writes through
//!   any handle are visible everywhere. [`Record::detach`] and
//!   [`Collection::to_json`] produce independent copies.
//!
//! - **[`Collection`]**: every operation (add, get, update, remove, find,
//!   where, filter, sort, map, pluck, ...) as a default trait method.
//!   Specialized collections wrap a `Store` and override what they need.
//!
//! - **Queries** ([`query`]): [`Predicate`] for `find`/`where_`, and a
//!   pluggable [`Matcher`] for the looser `filter`.
//!
//! - **Chain mode** ([`chain`]): after [`Collection::chain`], list results
//!   come back wrapped in a new collection for further calls.
//!
//! Collections are single-threaded (`!Send`). Callers sharing one across
//! threads must serialize access themselves.

pub mod chain;
pub mod error;
pub mod extend;
pub mod identity;
pub mod model;
pub mod query;
pub mod sort;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chain::Chained;
pub use error::{CoreError, json_kind};
pub use extend::Collection;
pub use identity::{IdentityAssigner, RandomIdentity, generate_id};
pub use model::{
    Fields, IdentityLookup, IntoRecords, Record, RecordKey, is_truthy, values_equal,
};
pub use query::{
    ExpressionMatcher, FilterComparator, FilterExpression, Matcher, Predicate,
};
pub use sort::{Comparator, FieldOrdering, NaturalOrder, SortKey};
pub use store::{AddOptions, DEFAULT_ID_ATTRIBUTE, Store, StoreOptions};

/// Everything needed to build and query collections.
pub mod prelude {
    pub use crate::{
        AddOptions, Chained, Collection, Comparator, FilterComparator, FilterExpression,
        IntoRecords, Predicate, Record, Store, StoreOptions,
    };
}
