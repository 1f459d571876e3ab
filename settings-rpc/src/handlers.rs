//! Request routing for the live query service.

use settings_registry::{Registry, SettingEntry};
use tracing::debug;

use crate::{GET_RUNNING_SETTINGS, RpcRequest, RpcResponse, RunningSettings};

/// Machine readable code for unknown procedures.
pub const UNKNOWN_METHOD: &str = "unknown_method";
/// Machine readable code for malformed request frames.
pub const INVALID_REQUEST: &str = "invalid_request";
/// Machine readable code for failures while producing a result.
pub const INTERNAL: &str = "internal";

/// Returns the live value and description of every registered setting.
///
/// Read-only: each entry comes from the setting's `get` accessor while the
/// registry is held under its shared lock.
#[must_use]
pub fn running_settings(registry: &Registry) -> Vec<SettingEntry> {
    registry.entries()
}

/// Routes a request to the matching procedure.
#[must_use]
pub fn dispatch(registry: &Registry, request: &RpcRequest) -> RpcResponse {
    debug!(method = %request.method, "live query request");
    match request.method.as_str() {
        GET_RUNNING_SETTINGS => {
            let payload = RunningSettings {
                settings: running_settings(registry),
            };
            match serde_json::to_value(payload) {
                Ok(value) => RpcResponse::ok(value),
                Err(err) => RpcResponse::error(INTERNAL, err.to_string()),
            }
        }
        other => RpcResponse::error(UNKNOWN_METHOD, format!("unknown method `{other}`")),
    }
}
