//! Error type unifying registry, store, transport, configuration, and reconciliation failures.

use settings_config::ConfigError;
use settings_registry::RegistryError;
use settings_rpc::RpcError;
use settings_store::StoreError;
use thiserror::Error;

use crate::ReconcileFailures;

/// Result alias for runtime operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors surfaced by [`AppSettings`](crate::AppSettings) operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Unknown setting name or rejected value.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The override store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The live query transport failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),
    /// Host configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// One or more stored overrides could not be applied.
    #[error(transparent)]
    Reconcile(#[from] ReconcileFailures),
    /// A running process was queried but no endpoint is configured.
    #[error("no live query endpoint configured")]
    EndpointNotConfigured,
}

impl SettingsError {
    /// Returns `true` when the error names an unregistered setting.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry(RegistryError::NotFound { .. }))
    }
}
