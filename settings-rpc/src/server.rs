//! Unix socket server for the live query service.

use std::future::Future;
use std::io::ErrorKind;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use settings_registry::Registry;
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::frame::{read_message, write_message};
use crate::handlers::{INVALID_REQUEST, dispatch};
use crate::{RpcError, RpcRequest, RpcResponse, RpcResult};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Read-only service exposing the registry's live values to other processes.
///
/// The service is inert unless an endpoint is configured.
#[derive(Debug, Clone)]
pub struct LiveQueryService {
    registry: Arc<Registry>,
    endpoint: Option<PathBuf>,
}

impl LiveQueryService {
    /// Creates the service for `registry`, exposed at `endpoint` when set.
    #[must_use]
    pub fn new(registry: Arc<Registry>, endpoint: Option<PathBuf>) -> Self {
        Self { registry, endpoint }
    }

    /// Returns the configured socket path.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Path> {
        self.endpoint.as_deref()
    }

    /// Returns `true` when an endpoint is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Binds the socket. Returns `Ok(None)` when no endpoint is configured.
    ///
    /// A stale socket left at the endpoint by a dead process is removed
    /// first. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Bind`] when the socket cannot be created, when the
    /// endpoint is occupied by something other than a socket, or when another
    /// process is still serving on it.
    pub fn bind(&self) -> RpcResult<Option<LiveQueryServer>> {
        let Some(path) = self.endpoint.clone() else {
            debug!("live query endpoint not configured; service inert");
            return Ok(None);
        };

        let bind_error = |source| RpcError::Bind {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(bind_error)?;
        }
        clear_stale_socket(&path).map_err(bind_error)?;
        let listener = UnixListener::bind(&path).map_err(bind_error)?;

        info!(path = %path.display(), "live query service listening");
        Ok(Some(LiveQueryServer {
            listener,
            path,
            registry: Arc::clone(&self.registry),
        }))
    }
}

/// Bound live query socket. The socket file is removed on drop.
#[derive(Debug)]
pub struct LiveQueryServer {
    listener: UnixListener,
    path: PathBuf,
    registry: Arc<Registry>,
}

impl LiveQueryServer {
    /// Returns the socket path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accepts connections until the listener fails. Each connection is
    /// served on its own task and carries one request. Transient accept
    /// failures are logged and retried after a short pause.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Io`] when the listener fails permanently.
    pub async fn run(self) -> RpcResult<()> {
        self.run_until(std::future::pending()).await
    }

    /// Like [`LiveQueryServer::run`], but returns `Ok(())` once `shutdown`
    /// completes.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Io`] when the listener fails permanently.
    pub async fn run_until<F>(self, shutdown: F) -> RpcResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!(path = %self.path.display(), "live query service stopped");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let stream = match accepted {
                        Ok((stream, _addr)) => stream,
                        Err(err) if is_transient_accept_error(&err) => {
                            warn!(?err, "live query accept failed; retrying");
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                        Err(err) => return Err(err.into()),
                    };
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        if let Err(err) = serve_connection(stream, &registry).await {
                            warn!(?err, "live query connection failed");
                        }
                    });
                }
            }
        }
    }

    /// Runs the accept loop on a background task.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<RpcResult<()>> {
        tokio::spawn(self.run())
    }
}

impl Drop for LiveQueryServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Removes a socket file nobody is listening on. Anything else at `path` is
/// left in place and reported.
fn clear_stale_socket(path: &Path) -> std::io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };
    if !metadata.file_type().is_socket() {
        return Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "endpoint exists and is not a socket",
        ));
    }
    if std::os::unix::net::UnixStream::connect(path).is_ok() {
        return Err(std::io::Error::new(
            ErrorKind::AddrInUse,
            "another process is serving on this endpoint",
        ));
    }
    std::fs::remove_file(path)?;
    debug!(path = %path.display(), "removed stale live query socket");
    Ok(())
}

/// Accept failures that leave the listener usable, such as a peer resetting
/// before the handshake completes or running out of file descriptors.
fn is_transient_accept_error(err: &std::io::Error) -> bool {
    const ENFILE: i32 = 23;
    const EMFILE: i32 = 24;
    matches!(
        err.kind(),
        ErrorKind::ConnectionAborted
            | ErrorKind::ConnectionReset
            | ErrorKind::Interrupted
            | ErrorKind::WouldBlock
            | ErrorKind::OutOfMemory
    ) || matches!(err.raw_os_error(), Some(ENFILE | EMFILE))
}

async fn serve_connection(mut stream: UnixStream, registry: &Registry) -> RpcResult<()> {
    let response = match read_message::<_, RpcRequest>(&mut stream).await {
        Ok(request) => dispatch(registry, &request),
        Err(RpcError::Serialization { source }) => {
            RpcResponse::error(INVALID_REQUEST, source.to_string())
        }
        Err(err) => return Err(err),
    };
    write_message(&mut stream, &response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use settings_registry::{SettingCell, SettingEntry};
    use tokio::io::AsyncWriteExt;

    use crate::frame::write_frame;
    use crate::{RunningSettingsClient, UnixSocketClient};

    fn registry() -> Arc<Registry> {
        let registry = Registry::new();
        registry
            .register_value("a", "A desc", SettingCell::new(String::from("A")))
            .unwrap();
        registry
            .register_value("b", "B desc", SettingCell::new(String::from("B")))
            .unwrap();
        Arc::new(registry)
    }

    #[tokio::test]
    async fn inert_without_endpoint() {
        let service = LiveQueryService::new(registry(), None);
        assert!(!service.is_enabled());
        assert!(service.bind().unwrap().is_none());
    }

    #[tokio::test]
    async fn serves_running_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.sock");
        let registry = registry();

        let server = LiveQueryService::new(Arc::clone(&registry), Some(path.clone()))
            .bind()
            .unwrap()
            .expect("endpoint configured");
        let handle = server.spawn();

        registry.lookup("b").unwrap().set("B2").unwrap();

        let client = UnixSocketClient::new(&path);
        let settings = client.running_settings().await.unwrap();
        assert_eq!(
            settings,
            vec![
                SettingEntry::new("a", "A", "A desc"),
                SettingEntry::new("b", "B2", "B desc"),
            ]
        );

        handle.abort();
        let _ = handle.await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn replaces_stale_socket_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.sock");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        let server = LiveQueryService::new(registry(), Some(path.clone()))
            .bind()
            .unwrap()
            .unwrap();
        assert_eq!(server.path(), path);
        drop(server);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn refuses_to_clobber_regular_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.db");
        std::fs::write(&path, b"precious").unwrap();

        let err = LiveQueryService::new(registry(), Some(path.clone()))
            .bind()
            .unwrap_err();
        assert!(matches!(err, RpcError::Bind { .. }));
        assert!(err.to_string().contains("not a socket"));
        assert_eq!(std::fs::read(&path).unwrap(), b"precious");
    }

    #[tokio::test]
    async fn refuses_to_take_over_a_live_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.sock");
        let service = LiveQueryService::new(registry(), Some(path.clone()));
        let first = service.bind().unwrap().unwrap();

        let err = service.bind().unwrap_err();
        let RpcError::Bind { source, .. } = &err else {
            panic!("expected a bind error, got {err:?}");
        };
        assert_eq!(source.kind(), ErrorKind::AddrInUse);
        assert!(path.exists());

        let handle = first.spawn();
        let settings = UnixSocketClient::new(&path).running_settings().await.unwrap();
        assert_eq!(settings.len(), 2);
        handle.abort();
    }

    #[test]
    fn classifies_accept_errors() {
        assert!(is_transient_accept_error(&std::io::Error::from_raw_os_error(24)));
        assert!(is_transient_accept_error(&std::io::Error::from(
            ErrorKind::ConnectionAborted
        )));
        assert!(!is_transient_accept_error(&std::io::Error::from(
            ErrorKind::InvalidInput
        )));
    }

    #[tokio::test]
    async fn malformed_requests_get_error_responses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.sock");
        let server = LiveQueryService::new(registry(), Some(path.clone()))
            .bind()
            .unwrap()
            .unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(server.run_until(async move {
            let _ = rx.await;
        }));

        let mut stream = UnixStream::connect(&path).await.unwrap();
        write_frame(&mut stream, b"{not json").await.unwrap();
        let response: RpcResponse = read_message(&mut stream).await.unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
        stream.shutdown().await.unwrap();

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
