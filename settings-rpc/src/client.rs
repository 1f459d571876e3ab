//! Client side of the live query service.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use settings_registry::SettingEntry;
use tokio::net::UnixStream;

use crate::frame::{read_message, write_message};
use crate::{RpcError, RpcRequest, RpcResponse, RpcResult, RunningSettings};

/// Source of another process's live settings.
#[async_trait]
pub trait RunningSettingsClient: Send + Sync {
    /// Fetches the live entries of the remote process.
    async fn running_settings(&self) -> RpcResult<Vec<SettingEntry>>;
}

/// Client dialing a live query socket. Each call opens a fresh connection;
/// failures are returned as-is without retry.
#[derive(Debug, Clone)]
pub struct UnixSocketClient {
    path: PathBuf,
}

impl UnixSocketClient {
    /// Creates a client for the socket at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the socket path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Invokes a remote procedure and returns its raw result.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Unreachable`] when the socket cannot be dialed,
    /// [`RpcError::Remote`] when the procedure fails, and I/O or protocol errors
    /// for broken exchanges.
    pub async fn call(&self, request: &RpcRequest) -> RpcResult<Value> {
        let mut stream =
            UnixStream::connect(&self.path)
                .await
                .map_err(|source| RpcError::Unreachable {
                    path: self.path.clone(),
                    source,
                })?;
        write_message(&mut stream, request).await?;
        let response: RpcResponse = read_message(&mut stream).await?;
        response.into_result()
    }
}

#[async_trait]
impl RunningSettingsClient for UnixSocketClient {
    async fn running_settings(&self) -> RpcResult<Vec<SettingEntry>> {
        let value = self.call(&RpcRequest::get_running_settings()).await?;
        let payload: RunningSettings = serde_json::from_value(value)?;
        Ok(payload.settings)
    }
}
