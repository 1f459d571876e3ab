//! The `settings` command family and a demo host process.
//!
//! [`SettingsCommand`] is a `clap` subcommand tree that any host binary can
//! mount; [`execute`] runs it against an [`AppSettings`](settings_runtime::AppSettings)
//! and writes human-readable output.

#![warn(missing_docs, clippy::pedantic)]

mod command;
pub mod demo;
pub mod output;

pub use command::{ListView, SettingsCommand, execute};
pub use output::{render_settings, settings_table};
