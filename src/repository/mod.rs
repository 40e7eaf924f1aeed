//! Storage layer: in-memory stores and flat-file persistence

pub mod catalog;
pub mod ledger;
pub mod store;
pub mod users;

pub use catalog::Catalog;
pub use ledger::LendingLedger;
pub use store::{FlatFileStore, Snapshot, SnapshotStore};
pub use users::UserRegistry;
