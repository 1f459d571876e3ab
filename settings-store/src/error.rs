//! Error types for the persistence layer.

use thiserror::Error;

/// Errors emitted by settings stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite backend rejected a statement or could not be opened.
    #[error("sqlite error: {source}")]
    Sqlite {
        /// Source [`rusqlite::Error`].
        #[from]
        source: rusqlite::Error,
    },
    /// Underlying I/O failure while preparing the store location.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// A previous writer panicked while holding the store lock.
    #[error("settings store lock poisoned")]
    Poisoned,
    /// Backend-specific failure described by a message.
    #[error("settings store unavailable: {reason}")]
    Unavailable {
        /// Human-readable reason describing the failure.
        reason: String,
    },
}

impl StoreError {
    /// Helper to construct [`StoreError::Unavailable`] from string-like values.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
