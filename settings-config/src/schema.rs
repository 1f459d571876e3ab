//! Strongly typed configuration schema.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Store location used when none is configured.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.db";

/// Log level used when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration handed to the settings runtime at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsConfig {
    /// Path of the SQLite file holding persisted overrides.
    pub settings_file: PathBuf,
    /// Socket path for the live query service. Unset disables the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<PathBuf>,
    /// Logging options.
    pub logging: LoggingConfig,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            endpoint: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl SettingsConfig {
    /// Creates a configuration storing overrides in `settings_file`.
    #[must_use]
    pub fn new(settings_file: impl Into<PathBuf>) -> Self {
        Self {
            settings_file: settings_file.into(),
            ..Self::default()
        }
    }

    /// Enables the live query service at `endpoint`.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<PathBuf>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Returns the store location.
    #[must_use]
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Returns the live query endpoint, if configured.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Path> {
        self.endpoint.as_deref()
    }

    /// Checks the configuration for values the runtime cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the store path is empty, the
    /// endpoint is empty, or the log level is unknown.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.settings_file.as_os_str().is_empty() {
            return Err(ConfigError::invalid("settings_file must not be empty"));
        }
        if self
            .endpoint
            .as_ref()
            .is_some_and(|endpoint| endpoint.as_os_str().is_empty())
        {
            return Err(ConfigError::invalid("endpoint must not be empty when set"));
        }
        self.logging.validate()
    }
}

/// Logging section of [`SettingsConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence at runtime.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        let level = self.level.to_ascii_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Ok(())
        } else {
            Err(ConfigError::invalid(format!(
                "unknown log level `{}` (expected one of {})",
                self.level,
                LOG_LEVELS.join(", ")
            )))
        }
    }
}
