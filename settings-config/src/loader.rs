//! Loads [`SettingsConfig`] from TOML and the environment.
//!
//! Precedence, highest first: environment variables, the TOML file, built-in
//! defaults. The environment is consulted through a lookup closure so callers
//! (and tests) can supply their own source.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{ConfigError, ConfigResult, SettingsConfig};

/// Overrides [`SettingsConfig::settings_file`].
pub const ENV_SETTINGS_FILE: &str = "APP_SETTINGS_FILE";
/// Overrides [`SettingsConfig::endpoint`]; an empty value disables the service.
pub const ENV_SOCKET: &str = "APP_SETTINGS_SOCKET";
/// Overrides the logging level.
pub const ENV_LOG_LEVEL: &str = "APP_SETTINGS_LOG_LEVEL";

/// Loads configuration from `path` (when given) and the process environment.
///
/// # Errors
///
/// See [`load_with`].
pub fn load(path: Option<&Path>) -> ConfigResult<SettingsConfig> {
    load_with(path, |key| std::env::var(key).ok())
}

/// Builds configuration from defaults and the process environment only.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the result fails validation.
pub fn load_from_env() -> ConfigResult<SettingsConfig> {
    load(None)
}

/// Loads configuration from `path` (when given), then applies overrides
/// returned by `lookup` for the `APP_SETTINGS_*` keys.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] or [`ConfigError::Parse`] when the file cannot
/// be read or parsed, and [`ConfigError::Invalid`] when the merged result
/// fails validation.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> ConfigResult<SettingsConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => SettingsConfig::default(),
    };

    if let Some(file) = lookup(ENV_SETTINGS_FILE) {
        debug!(key = ENV_SETTINGS_FILE, "config overridden from environment");
        config.settings_file = PathBuf::from(file);
    }
    if let Some(socket) = lookup(ENV_SOCKET) {
        debug!(key = ENV_SOCKET, "config overridden from environment");
        config.endpoint = (!socket.is_empty()).then(|| PathBuf::from(socket));
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        debug!(key = ENV_LOG_LEVEL, "config overridden from environment");
        config.logging.level = level;
    }

    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> ConfigResult<SettingsConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_with(None, no_env).unwrap();
        assert_eq!(config, SettingsConfig::default());
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
settings_file = "/data/app.db"
endpoint = "/run/app.sock"

[logging]
level = "debug"
"#,
        );

        let config = load_with(Some(&path), no_env).unwrap();
        assert_eq!(config.settings_file(), Path::new("/data/app.db"));
        assert_eq!(config.endpoint(), Some(Path::new("/run/app.sock")));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn environment_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "settings_file = \"/data/app.db\"\nendpoint = \"/run/app.sock\"\n");
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SETTINGS_FILE, "/tmp/override.db"),
            (ENV_SOCKET, ""),
            (ENV_LOG_LEVEL, "warn"),
        ]);

        let config = load_with(Some(&path), |key| env.get(key).map(|v| (*v).to_owned())).unwrap();
        assert_eq!(config.settings_file(), Path::new("/tmp/override.db"));
        assert!(config.endpoint().is_none());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn reports_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = load_with(Some(&missing), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let path = write(&dir, "settings_file = [1, 2]\n");
        let err = load_with(Some(&path), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let path = write(&dir, "unexpected = true\n");
        let err = load_with(Some(&path), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn merged_result_is_validated() {
        let err = load_with(None, |key| (key == ENV_LOG_LEVEL).then(|| "chatty".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
