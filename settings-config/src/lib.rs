//! Host configuration for the settings runtime.
//!
//! A host supplies two things: where the override store lives and, optionally,
//! the socket path on which the live query service is exposed. Configuration is
//! read from a TOML file and then overlaid with `APP_SETTINGS_*` environment
//! variables.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_LOG_LEVEL, ENV_SETTINGS_FILE, ENV_SOCKET, load, load_from_env, load_with};
pub use schema::{DEFAULT_LOG_LEVEL, DEFAULT_SETTINGS_FILE, LoggingConfig, SettingsConfig};
