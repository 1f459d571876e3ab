//! Typed runtime settings with persisted overrides and live inspection.
//!
//! Depend on this crate to get the whole stack; the component crates sit
//! behind feature flags so hosts that only need the registry can leave the
//! store, transport, and runtime out.

#![warn(missing_docs, clippy::pedantic)]

/// String codecs for setting values.
pub use settings_codec as codec;

/// Setting registry.
pub use settings_registry as registry;

/// Override store (enabled by `store` feature).
#[cfg(feature = "store")]
pub use settings_store as store;

/// Live query service and client (enabled by `rpc` feature).
#[cfg(feature = "rpc")]
pub use settings_rpc as rpc;

/// Reconciliation and command surface (enabled by `runtime` feature).
#[cfg(feature = "runtime")]
pub use settings_runtime as runtime;

/// Host configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use settings_config as config;

/// Logging bootstrap (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use settings_telemetry as telemetry;

/// `settings` command family (enabled by `cli` feature).
#[cfg(feature = "cli")]
pub use settings_cli as cli;

pub use settings_registry::{Registry, RegistryError, Setting, SettingCell, SettingEntry};

#[cfg(feature = "runtime")]
pub use settings_runtime::{AppSettings, ReconcileReport, SettingsError, SettingsResult};
