//! Wire-level structures exchanged with the live query service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use settings_registry::SettingEntry;

use crate::{RpcError, RpcResult};

/// Name of the procedure returning a process's live settings.
pub const GET_RUNNING_SETTINGS: &str = "Settings.GetRunningSettings";

/// Request frame: a procedure name plus optional parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Procedure to invoke.
    pub method: String,
    /// Procedure parameters; `null` for zero-argument calls.
    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    /// Creates a zero-argument request for `method`.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Value::Null,
        }
    }

    /// Creates the request for [`GET_RUNNING_SETTINGS`].
    #[must_use]
    pub fn get_running_settings() -> Self {
        Self::new(GET_RUNNING_SETTINGS)
    }
}

/// Error payload carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message.
    pub error: String,
    /// Machine readable error code.
    pub code: String,
}

/// Response frame carrying exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Procedure output on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl RpcResponse {
    /// Builds a successful response.
    #[must_use]
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Builds a failed response.
    #[must_use]
    pub fn error(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(ErrorResponse {
                error: error.into(),
                code: code.into(),
            }),
        }
    }

    /// Converts the response into the procedure output.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Remote`] for error responses and
    /// [`RpcError::Protocol`] when neither field is present.
    pub fn into_result(self) -> RpcResult<Value> {
        if let Some(ErrorResponse { error, code }) = self.error {
            return Err(RpcError::Remote {
                code,
                message: error,
            });
        }
        self.result
            .ok_or_else(|| RpcError::protocol("response carried neither result nor error"))
    }
}

/// Result payload of [`GET_RUNNING_SETTINGS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningSettings {
    /// Live entries in registration order.
    pub settings: Vec<SettingEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_null_params() {
        let encoded = serde_json::to_value(RpcRequest::get_running_settings()).unwrap();
        assert_eq!(
            encoded,
            serde_json::json!({ "method": "Settings.GetRunningSettings", "params": null })
        );

        let decoded: RpcRequest =
            serde_json::from_str(r#"{"method":"Settings.GetRunningSettings"}"#).unwrap();
        assert_eq!(decoded, RpcRequest::get_running_settings());
    }

    #[test]
    fn error_responses_surface_as_remote_errors() {
        let err = RpcResponse::error("unknown_method", "nope")
            .into_result()
            .unwrap_err();
        assert!(matches!(err, RpcError::Remote { code, message } if code == "unknown_method" && message == "nope"));

        let empty = RpcResponse {
            result: None,
            error: None,
        };
        assert!(matches!(empty.into_result(), Err(RpcError::Protocol { .. })));
    }
}
