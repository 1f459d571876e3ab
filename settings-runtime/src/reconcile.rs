//! Reconciliation of persisted overrides against the live registry.
//!
//! A pass runs four phases in order:
//!
//! 1. capture defaults for any setting not captured yet,
//! 2. load every stored override (a store failure aborts before anything is
//!    touched),
//! 3. restore captured defaults for settings that no longer have an override,
//! 4. apply each override whose key is registered, collecting failures per key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::RwLock;

use settings_registry::{Registry, RegistryError, SettingEntry};
use settings_store::SettingsStore;
use tracing::{debug, info, warn};

use crate::SettingsResult;

/// Compiled-in values captured before any override is applied.
///
/// Each setting is captured at most once; later captures only add settings
/// registered since the previous one.
#[derive(Debug, Default)]
pub struct Defaults {
    entries: RwLock<BTreeMap<String, SettingEntry>>,
}

impl Defaults {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the live value of every setting not yet captured and returns
    /// how many were added.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn capture(&self, registry: &Registry) -> usize {
        let mut entries = self.entries.write().expect("defaults snapshot poisoned");
        let mut added = 0;
        for entry in registry.entries() {
            if !entries.contains_key(&entry.key) {
                entries.insert(entry.key.clone(), entry);
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, "captured setting defaults");
        }
        added
    }

    /// Returns the captured entries sorted by key.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<SettingEntry> {
        let entries = self.entries.read().expect("defaults snapshot poisoned");
        entries.values().cloned().collect()
    }

    /// Returns the captured value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().expect("defaults snapshot poisoned");
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Forgets every captured value. Intended for tests.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("defaults snapshot poisoned")
            .clear();
    }
}

/// Outcome of a reconciliation pass in which every override applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Keys whose stored override was applied.
    pub applied: Vec<String>,
    /// Keys reset to their captured default because no override remains.
    pub restored: Vec<String>,
    /// Stored keys with no registered setting.
    pub ignored: Vec<String>,
}

/// A single key that could not be reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFailure {
    /// Setting name.
    pub key: String,
    /// Value that was rejected.
    pub value: String,
    /// Why it was rejected.
    pub error: RegistryError,
}

/// Every per-key failure of a reconciliation pass.
///
/// Displays one line per failed key; keys that applied are never mentioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileFailures {
    failures: Vec<KeyFailure>,
    report: ReconcileReport,
}

impl ReconcileFailures {
    /// Returns the failed keys in the order they were attempted.
    #[must_use]
    pub fn failures(&self) -> &[KeyFailure] {
        &self.failures
    }

    /// Returns what did succeed during the failed pass.
    #[must_use]
    pub fn report(&self) -> &ReconcileReport {
        &self.report
    }

    /// Returns the names of the failed keys.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.key.as_str()).collect()
    }
}

impl fmt::Display for ReconcileFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, failure) in self.failures.iter().enumerate() {
            if position > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReconcileFailures {}

/// Runs a reconciliation pass.
///
/// # Errors
///
/// Returns [`SettingsError::Store`](crate::SettingsError::Store) when the
/// overrides cannot be loaded, in which case no setting is modified, and
/// [`SettingsError::Reconcile`](crate::SettingsError::Reconcile) when one or
/// more overrides were rejected; every other override is still applied.
pub fn reconcile(
    registry: &Registry,
    store: &dyn SettingsStore,
    defaults: &Defaults,
) -> SettingsResult<ReconcileReport> {
    defaults.capture(registry);
    let overrides = store.find_all()?;

    let mut report = ReconcileReport::default();
    let mut failures = Vec::new();

    let overridden: BTreeSet<&str> = overrides.iter().map(|row| row.key.as_str()).collect();
    for entry in defaults.entries() {
        if overridden.contains(entry.key.as_str()) {
            continue;
        }
        let Ok(setting) = registry.lookup(&entry.key) else {
            continue;
        };
        if setting.get() == entry.value {
            continue;
        }
        match setting.set(&entry.value) {
            Ok(()) => {
                debug!(setting = %entry.key, "restored default");
                report.restored.push(entry.key);
            }
            Err(error) => {
                warn!(setting = %entry.key, %error, "failed to restore default");
                failures.push(KeyFailure {
                    key: entry.key,
                    value: entry.value,
                    error,
                });
            }
        }
    }

    for row in overrides {
        let setting = match registry.lookup(&row.key) {
            Ok(setting) => setting,
            Err(_) => {
                debug!(setting = %row.key, "ignoring override for unregistered setting");
                report.ignored.push(row.key);
                continue;
            }
        };
        match setting.set(&row.value) {
            Ok(()) => {
                debug!(setting = %row.key, value = %row.value, "applied override");
                report.applied.push(row.key);
            }
            Err(error) => {
                warn!(setting = %row.key, %error, "rejected stored override");
                failures.push(KeyFailure {
                    key: row.key,
                    value: row.value,
                    error,
                });
            }
        }
    }

    info!(
        applied = report.applied.len(),
        restored = report.restored.len(),
        ignored = report.ignored.len(),
        failed = failures.len(),
        "settings reconciled"
    );

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(ReconcileFailures { failures, report }.into())
    }
}
