//! Persistence for saved setting overrides.
//!
//! The runtime only needs a keyed table with upsert semantics; this crate
//! provides the contract plus a SQLite backend for real hosts and an
//! in-memory backend for tests.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{SettingsStore, StoredOverride};
