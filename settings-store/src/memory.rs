//! In-memory settings store for tests and hosts without durable storage.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::{SettingsStore, StoreError, StoreResult, StoredOverride};

/// Settings store backed by an ordered map; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(key, value)` rows.
    #[must_use]
    pub fn with_rows<K, V>(rows: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            rows: RwLock::new(
                rows.into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn find_all(&self) -> StoreResult<Vec<StoredOverride>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows
            .iter()
            .map(|(key, value)| StoredOverride::new(key, value))
            .collect())
    }

    fn find(&self, key: &str) -> StoreResult<Option<StoredOverride>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get(key).map(|value| StoredOverride::new(key, value)))
    }

    fn upsert(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        rows.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.remove(key).is_some())
    }
}
