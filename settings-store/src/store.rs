//! Persistence contract consumed by the settings runtime.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::StoreResult;

/// A saved value for one setting name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOverride {
    /// Setting name.
    pub key: String,
    /// String-encoded value exactly as it was saved.
    pub value: String,
}

impl StoredOverride {
    /// Creates an override row.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Key/value store holding at most one row per key.
pub trait SettingsStore: Send + Sync {
    /// Returns every stored override ordered by key. An empty store yields an
    /// empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::StoreError) when the backend cannot be read.
    fn find_all(&self) -> StoreResult<Vec<StoredOverride>>;

    /// Returns the override stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::StoreError) when the backend cannot be read.
    fn find(&self, key: &str) -> StoreResult<Option<StoredOverride>>;

    /// Inserts or replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::StoreError) when the write fails.
    fn upsert(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes the row stored under `key`, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::StoreError) when the write fails.
    fn delete(&self, key: &str) -> StoreResult<bool>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    fn find_all(&self) -> StoreResult<Vec<StoredOverride>> {
        (**self).find_all()
    }

    fn find(&self, key: &str) -> StoreResult<Option<StoredOverride>> {
        (**self).find(key)
    }

    fn upsert(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).upsert(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key)
    }
}
