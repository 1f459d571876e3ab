//! Demo host for the settings runtime.
//!
//! Registers a handful of sample settings, applies saved overrides, and then
//! either serves live values over the configured socket or runs one of the
//! `settings` commands.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use settings_cli::{SettingsCommand, demo, execute};
use settings_registry::Registry;
use settings_runtime::{AppSettings, SettingsError};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "app-settings-demo", version, about = "Demo host for typed runtime settings")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "APP_SETTINGS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Expose live settings on the configured socket until Ctrl-C.
    Serve,
    /// Inspect and change settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = settings_config::load(cli.config.as_deref())?;
    settings_telemetry::init_tracing(&config.logging.level)?;

    let registry = Arc::new(Registry::new());
    let sample = demo::register(&registry)?;
    let settings = AppSettings::open(&config, registry)?;

    match settings.reconcile() {
        Ok(report) => info!(applied = report.applied.len(), "saved settings applied"),
        Err(SettingsError::Reconcile(failures)) => {
            warn!("some saved settings were rejected:\n{failures}");
        }
        Err(err) => return Err(err.into()),
    }

    match cli.command {
        Command::Serve => {
            let Some(server) = settings.live_query_service().bind()? else {
                bail!("no endpoint configured; set `endpoint` in the config file or APP_SETTINGS_SOCKET");
            };
            info!(greeting = %sample.greeting.get(), path = %server.path().display(), "serving live settings, Ctrl-C to stop");
            server
                .run_until(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
        Command::Settings(command) => {
            let mut stdout = std::io::stdout();
            execute(&settings, &command, &mut stdout).await?;
        }
    }
    Ok(())
}
