//! Command surface over the registry, the override store, and the live query
//! service.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use settings_config::SettingsConfig;
use settings_registry::{Registry, Setting, SettingEntry};
use settings_rpc::{LiveQueryService, RunningSettingsClient, UnixSocketClient};
use settings_store::{SettingsStore, SqliteStore};
use tracing::{debug, info};

use crate::reconcile::{Defaults, ReconcileReport, reconcile};
use crate::{SettingsError, SettingsResult};

/// Settings runtime bound to one registry and one override store.
///
/// Every list view is a fresh `Vec` sorted by key; nothing returned aliases
/// internal state.
pub struct AppSettings {
    registry: Arc<Registry>,
    store: Arc<dyn SettingsStore>,
    defaults: Defaults,
    applied: RwLock<BTreeSet<String>>,
    live_query: LiveQueryService,
}

impl AppSettings {
    /// Creates the runtime and captures the defaults of everything registered
    /// so far.
    #[must_use]
    pub fn new(
        registry: Arc<Registry>,
        store: Arc<dyn SettingsStore>,
        endpoint: Option<PathBuf>,
    ) -> Self {
        let defaults = Defaults::new();
        defaults.capture(&registry);
        let live_query = LiveQueryService::new(Arc::clone(&registry), endpoint);
        Self {
            registry,
            store,
            defaults,
            applied: RwLock::default(),
            live_query,
        }
    }

    /// Validates `config` and opens the SQLite store it names.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Config`] for an unusable configuration and
    /// [`SettingsError::Store`] when the store cannot be opened.
    pub fn open(config: &SettingsConfig, registry: Arc<Registry>) -> SettingsResult<Self> {
        config.validate()?;
        let store = SqliteStore::open(config.settings_file())?;
        info!(
            path = %config.settings_file().display(),
            endpoint = ?config.endpoint(),
            "settings store opened"
        );
        Ok(Self::new(
            registry,
            Arc::new(store),
            config.endpoint().map(Path::to_path_buf),
        ))
    }

    /// Applies persisted overrides to the live settings.
    ///
    /// # Errors
    ///
    /// See [`reconcile`](crate::reconcile::reconcile).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn reconcile(&self) -> SettingsResult<ReconcileReport> {
        let result = reconcile(&self.registry, self.store.as_ref(), &self.defaults);
        let report = match &result {
            Ok(report) => Some(report),
            Err(SettingsError::Reconcile(failures)) => Some(failures.report()),
            Err(_) => None,
        };
        if let Some(report) = report {
            let mut applied = self.applied.write().expect("applied overrides poisoned");
            applied.clear();
            applied.extend(report.applied.iter().cloned());
        }
        result
    }

    /// Returns the values captured before any override was applied.
    #[must_use]
    pub fn list_defaults(&self) -> Vec<SettingEntry> {
        self.defaults.capture(&self.registry);
        self.defaults.entries()
    }

    /// Returns every persisted override. Descriptions are taken from the
    /// matching registered setting and left empty for unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Store`] when the store cannot be read.
    pub fn list_saved(&self) -> SettingsResult<Vec<SettingEntry>> {
        let mut saved: Vec<SettingEntry> = self
            .store
            .find_all()?
            .into_iter()
            .map(|row| {
                let description = self
                    .registry
                    .lookup(&row.key)
                    .map(|setting| setting.description().to_owned())
                    .unwrap_or_default();
                SettingEntry::new(row.key, row.value, description)
            })
            .collect();
        saved.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(saved)
    }

    /// Returns the defaults with each persisted override superimposed that
    /// was successfully applied by [`AppSettings::reconcile`] or
    /// [`AppSettings::save`]. Rejected rows keep showing the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Store`] when the store cannot be read.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn list_active(&self) -> SettingsResult<Vec<SettingEntry>> {
        let rows = self.store.find_all()?;
        let applied = self.applied.read().expect("applied overrides poisoned");
        let saved: HashMap<String, String> = rows
            .into_iter()
            .filter(|row| applied.contains(&row.key))
            .map(|row| (row.key, row.value))
            .collect();
        drop(applied);
        let mut active = self.list_defaults();
        for entry in &mut active {
            if let Some(value) = saved.get(&entry.key) {
                entry.value.clone_from(value);
            }
        }
        Ok(active)
    }

    /// Fetches the live values of the process serving the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EndpointNotConfigured`] when no endpoint is set
    /// and [`SettingsError::Rpc`] when the query fails.
    pub async fn list_running(&self) -> SettingsResult<Vec<SettingEntry>> {
        let endpoint = self
            .live_query
            .endpoint()
            .ok_or(SettingsError::EndpointNotConfigured)?;
        let client = UnixSocketClient::new(endpoint);
        self.list_running_with(&client).await
    }

    /// Fetches live values through `client`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Rpc`] when the query fails.
    pub async fn list_running_with<C>(&self, client: &C) -> SettingsResult<Vec<SettingEntry>>
    where
        C: RunningSettingsClient + ?Sized,
    {
        let mut running = client.running_settings().await?;
        running.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(running)
    }

    /// Applies `value` to the live setting and persists it on success.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Registry`] for an unknown name or a rejected
    /// value (nothing is persisted), and [`SettingsError::Store`] when the
    /// store write fails.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn save(&self, name: &str, value: &str) -> SettingsResult<()> {
        let setting = self.registry.lookup(name)?;
        self.defaults.capture(&self.registry);
        setting.set(value)?;
        self.store.upsert(name, value)?;
        self.applied
            .write()
            .expect("applied overrides poisoned")
            .insert(name.to_owned());
        info!(setting = %name, %value, "setting saved");
        Ok(())
    }

    /// Deletes the persisted override for `name`. The live value is left as
    /// is until the next reconciliation.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Registry`] for an unknown name and
    /// [`SettingsError::Store`] when the delete fails.
    pub fn remove(&self, name: &str) -> SettingsResult<()> {
        self.registry.lookup(name)?;
        if self.store.delete(name)? {
            info!(setting = %name, "saved setting removed");
        } else {
            debug!(setting = %name, "no saved override to remove");
        }
        Ok(())
    }

    /// Returns the setting registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Registry`] when no such setting exists.
    pub fn setting(&self, name: &str) -> SettingsResult<Setting> {
        Ok(self.registry.lookup(name)?)
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Returns the override store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Returns a name to live value map of every setting.
    #[must_use]
    pub fn vars(&self) -> BTreeMap<String, String> {
        self.registry.vars()
    }

    /// Returns the live query service for this runtime's registry.
    #[must_use]
    pub fn live_query_service(&self) -> &LiveQueryService {
        &self.live_query
    }

    /// Forgets captured defaults so the next capture starts over. Intended for
    /// tests.
    pub fn reset_defaults(&self) {
        self.defaults.clear();
    }
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("settings", &self.registry.len())
            .field("endpoint", &self.live_query.endpoint())
            .finish_non_exhaustive()
    }
}
