// ── Record storage ──

pub mod collection;
pub mod options;

pub use collection::Store;
pub use options::{AddOptions, DEFAULT_ID_ATTRIBUTE, StoreOptions};
