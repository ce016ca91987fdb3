// ── Record model ──
//
// Records, their identity keys, and the conversions that feed them into
// a store.

pub mod key;
pub mod record;

pub use key::{IdentityLookup, RecordKey, is_truthy, values_equal};
pub use record::{Fields, IntoRecords, Record};
