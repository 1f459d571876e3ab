//! Live query service for running processes.
//!
//! A host process exposes one read-only procedure,
//! [`GET_RUNNING_SETTINGS`], over a Unix stream socket. A separate process
//! (usually the settings CLI) dials the socket to see what values are live
//! right now, independent of what is persisted.

#![warn(missing_docs, clippy::pedantic)]

mod client;
mod error;
pub mod frame;
mod handlers;
mod server;
mod wire;

pub use client::{RunningSettingsClient, UnixSocketClient};
pub use error::{RpcError, RpcResult};
pub use handlers::{INTERNAL, INVALID_REQUEST, UNKNOWN_METHOD, dispatch, running_settings};
pub use server::{LiveQueryServer, LiveQueryService};
pub use wire::{ErrorResponse, GET_RUNNING_SETTINGS, RpcRequest, RpcResponse, RunningSettings};
