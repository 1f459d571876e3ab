//! Reconciliation engine and command surface for the settings registry.
//!
//! [`AppSettings`] ties a [`Registry`](settings_registry::Registry) to an
//! override store and an optional live query endpoint. At startup the host
//! calls [`AppSettings::reconcile`] to apply persisted overrides; afterwards
//! the list/save/remove operations back the `settings` command family.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod reconcile;
mod settings;

pub use error::{SettingsError, SettingsResult};
pub use reconcile::{Defaults, KeyFailure, ReconcileFailures, ReconcileReport};
pub use settings::AppSettings;
