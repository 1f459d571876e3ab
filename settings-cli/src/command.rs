//! `settings` subcommands and their execution against [`AppSettings`].

use std::io::Write;

use anyhow::Result;
use clap::Subcommand;
use settings_runtime::AppSettings;

use crate::output::render_settings;

/// The `settings` command family.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SettingsCommand {
    /// Show one view of the settings.
    List {
        /// Which view to show.
        #[command(subcommand)]
        view: ListView,
    },
    /// Apply a value to a setting and persist it.
    #[command(visible_alias = "set")]
    Save {
        /// Setting name.
        name: String,
        /// New value, in the setting's string encoding.
        value: String,
    },
    /// Delete the persisted value of a setting.
    #[command(visible_alias = "unset")]
    Remove {
        /// Setting name.
        name: String,
    },
}

/// Views accepted by `settings list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ListView {
    /// Values captured before any saved value was applied.
    Defaults,
    /// Values persisted in the settings store.
    Saved,
    /// Defaults with saved values applied.
    Active,
    /// Live values of the process serving the configured socket.
    Running,
}

/// Runs `command` against `settings`, writing its output to `out`.
///
/// # Errors
///
/// Returns the underlying settings error (unknown name, rejected value, store
/// or transport failure) or a write failure on `out`.
pub async fn execute<W>(settings: &AppSettings, command: &SettingsCommand, out: &mut W) -> Result<()>
where
    W: Write,
{
    match command {
        SettingsCommand::List { view } => {
            let entries = match view {
                ListView::Defaults => settings.list_defaults(),
                ListView::Saved => settings.list_saved()?,
                ListView::Active => settings.list_active()?,
                ListView::Running => settings.list_running().await?,
            };
            writeln!(out, "{}", render_settings(&entries))?;
        }
        SettingsCommand::Save { name, value } => {
            settings.save(name, value)?;
            writeln!(out, "Setting {name} saved to {value}")?;
        }
        SettingsCommand::Remove { name } => {
            settings.remove(name)?;
            writeln!(out, "Setting {name} removed")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clap::Parser;
    use settings_registry::{Registry, SettingCell};
    use settings_runtime::SettingsError;
    use settings_store::MemoryStore;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(subcommand)]
        command: SettingsCommand,
    }

    fn parse(args: &[&str]) -> SettingsCommand {
        Harness::try_parse_from(std::iter::once("settings").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    fn settings() -> AppSettings {
        let registry = Arc::new(Registry::new());
        registry
            .register_value("foo", "Foo setting", SettingCell::new(String::from("x")))
            .unwrap();
        AppSettings::new(registry, Arc::new(MemoryStore::new()), None)
    }

    async fn run(settings: &AppSettings, args: &[&str]) -> Result<String> {
        let mut out = Vec::new();
        execute(settings, &parse(args), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn aliases_parse_to_the_same_command() {
        assert_eq!(parse(&["set", "foo", "y"]), parse(&["save", "foo", "y"]));
        assert_eq!(parse(&["unset", "foo"]), parse(&["remove", "foo"]));
        assert_eq!(
            parse(&["list", "running"]),
            SettingsCommand::List {
                view: ListView::Running
            }
        );
        assert!(Harness::try_parse_from(["settings", "list", "everything"]).is_err());
    }

    #[tokio::test]
    async fn save_list_remove_flow() {
        let settings = settings();

        let message = run(&settings, &["save", "foo", "y"]).await.unwrap();
        assert_eq!(message, "Setting foo saved to y\n");

        let saved = run(&settings, &["list", "saved"]).await.unwrap();
        assert!(saved.contains("foo"));
        assert!(saved.contains("Foo setting"));

        let defaults = run(&settings, &["list", "defaults"]).await.unwrap();
        assert!(defaults.contains(" x "));

        let active = run(&settings, &["list", "active"]).await.unwrap();
        assert!(active.contains(" y "));

        let message = run(&settings, &["unset", "foo"]).await.unwrap();
        assert_eq!(message, "Setting foo removed\n");
        let saved = run(&settings, &["list", "saved"]).await.unwrap();
        assert!(!saved.contains("foo"));
    }

    #[tokio::test]
    async fn failures_surface_as_errors() {
        let settings = settings();

        let err = run(&settings, &["save", "missing", "1"]).await.unwrap_err();
        let err = err.downcast::<SettingsError>().unwrap();
        assert!(err.is_not_found());

        let err = run(&settings, &["list", "running"]).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::EndpointNotConfigured)
        ));
    }
}
