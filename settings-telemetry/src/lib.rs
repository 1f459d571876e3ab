//! Structured logging bootstrap.
//!
//! Installs a `tracing-subscriber` fmt subscriber whose filter comes from
//! `RUST_LOG` when set, falling back to the configured level.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Parser message.
        reason: String,
    },
}

/// Builds the filter used by [`init_tracing`].
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `RUST_LOG` is unset and
/// `level` is not a valid directive.
pub fn env_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|err| TelemetryError::InvalidFilter {
            directive: level.to_owned(),
            reason: err.to_string(),
        }),
    }
}

/// Installs the global fmt subscriber at `level`.
///
/// Returns `Ok(false)` when a global subscriber was already installed, so the
/// call is safe to repeat.
///
/// # Errors
///
/// See [`env_filter`].
pub fn init_tracing(level: &str) -> Result<bool, TelemetryError> {
    let filter = env_filter(level)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_tracing("debug").unwrap();
        assert!(!init_tracing("debug").unwrap());
        tracing::info!("telemetry test event");
    }
}
