//! Transport errors for the live query service and its client.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for live query operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Errors raised while exposing or querying live settings.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The service socket could not be bound.
    #[error("cannot bind live query socket {}: {source}", path.display())]
    Bind {
        /// Socket path that failed to bind.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The endpoint could not be reached.
    #[error("cannot connect to live query socket {}: {source}", path.display())]
    Unreachable {
        /// Socket path that was dialed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// I/O failure on an established connection.
    #[error("live query i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// Frame payload could not be encoded or decoded.
    #[error("live query serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: serde_json::Error,
    },
    /// Peer violated the framing or response protocol.
    #[error("live query protocol error: {reason}")]
    Protocol {
        /// Human-readable description of the violation.
        reason: String,
    },
    /// The remote procedure reported a failure.
    #[error("live query call failed ({code}): {message}")]
    Remote {
        /// Machine readable error code.
        code: String,
        /// Human readable message.
        message: String,
    },
}

impl RpcError {
    /// Helper to construct [`RpcError::Protocol`].
    #[must_use]
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }
}
