//! Typed settings registry.
//!
//! Application code registers named settings bound to in-process variables;
//! the registry maps each name to a live `get`/`set` pair that encodes values
//! as strings through a codec from [`settings_codec`].

#![warn(missing_docs, clippy::pedantic)]

mod cell;
mod registry;
mod setting;

pub use cell::SettingCell;
pub use registry::{Registry, RegistryError, RegistryResult};
pub use setting::{Setting, SettingAccess, SettingEntry, SettingSource};

/// Codec types re-exported for registration call sites.
pub use settings_codec as codec;
