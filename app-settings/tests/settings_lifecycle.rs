use std::sync::Arc;
use std::time::Duration;

use app_settings::config::SettingsConfig;
use app_settings::store::{SettingsStore, SqliteStore};
use app_settings::{AppSettings, Registry, SettingCell, SettingEntry, SettingsError};

struct Host {
    settings: AppSettings,
    name: SettingCell<String>,
    workers: SettingCell<u32>,
    timeout: SettingCell<Duration>,
}

fn host(config: &SettingsConfig) -> Host {
    let registry = Arc::new(Registry::new());
    let name = SettingCell::new(String::from("x"));
    let workers = SettingCell::new(4_u32);
    let timeout = SettingCell::new(Duration::from_secs(5));
    registry
        .register_value("foo", "Display name", name.clone())
        .unwrap();
    registry
        .register_value("workers", "Worker threads", workers.clone())
        .unwrap();
    registry
        .register_value("timeout", "Request timeout", timeout.clone())
        .unwrap();
    let settings = AppSettings::open(config, registry).unwrap();
    Host {
        settings,
        name,
        workers,
        timeout,
    }
}

fn values(entries: &[SettingEntry]) -> Vec<(&str, &str)> {
    entries
        .iter()
        .map(|entry| (entry.key.as_str(), entry.value.as_str()))
        .collect()
}

#[test]
fn saved_values_follow_the_process_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let config = SettingsConfig::new(dir.path().join("settings.db"));

    let first = host(&config);
    first.settings.reconcile().unwrap();
    first.settings.save("foo", "y").unwrap();
    first.settings.save("timeout", "1m 30s").unwrap();
    assert_eq!(first.timeout.get(), Duration::from_secs(90));
    drop(first);

    let second = host(&config);
    let report = second.settings.reconcile().unwrap();
    assert_eq!(report.applied, vec!["foo".to_owned(), "timeout".to_owned()]);
    assert_eq!(second.name.get(), "y");
    assert_eq!(second.timeout.get(), Duration::from_secs(90));

    assert_eq!(
        values(&second.settings.list_defaults()),
        vec![("foo", "x"), ("timeout", "5s"), ("workers", "4")]
    );
    assert_eq!(
        values(&second.settings.list_active().unwrap()),
        vec![("foo", "y"), ("timeout", "1m 30s"), ("workers", "4")]
    );

    second.settings.remove("foo").unwrap();
    assert_eq!(second.name.get(), "y");
    second.settings.reconcile().unwrap();
    assert_eq!(second.name.get(), "x");
    assert_eq!(values(&second.settings.list_saved().unwrap()), vec![("timeout", "1m 30s")]);
}

#[test]
fn rejected_rows_are_reported_together() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.db");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.upsert("foo", "z").unwrap();
        store.upsert("workers", "many").unwrap();
        store.upsert("timeout", "soon").unwrap();
        store.upsert("legacy_flag", "true").unwrap();
    }

    let host = host(&SettingsConfig::new(&path));
    let err = host.settings.reconcile().unwrap_err();
    let SettingsError::Reconcile(failures) = err else {
        panic!("expected aggregated failures, got {err:?}");
    };
    assert_eq!(failures.keys(), vec!["timeout", "workers"]);
    assert_eq!(failures.report().applied, vec!["foo".to_owned()]);
    assert_eq!(failures.report().ignored, vec!["legacy_flag".to_owned()]);
    assert_eq!(failures.to_string().lines().count(), 2);

    assert_eq!(host.name.get(), "z");
    assert_eq!(host.workers.get(), 4);
    assert_eq!(host.timeout.get(), Duration::from_secs(5));
}

#[tokio::test]
async fn cli_process_reads_the_running_host() {
    let dir = tempfile::tempdir().unwrap();
    let config = SettingsConfig::new(dir.path().join("settings.db"))
        .with_endpoint(dir.path().join("run").join("settings.sock"));

    let running = host(&config);
    running.settings.reconcile().unwrap();
    let server = running
        .settings
        .live_query_service()
        .bind()
        .unwrap()
        .unwrap();
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let serving = tokio::spawn(server.run_until(async move {
        let _ = stopped.await;
    }));

    running.workers.set(16);

    let cli = AppSettings::open(&config, Arc::new(Registry::new())).unwrap();
    let live = cli.list_running().await.unwrap();
    assert_eq!(
        live,
        vec![
            SettingEntry::new("foo", "x", "Display name"),
            SettingEntry::new("timeout", "5s", "Request timeout"),
            SettingEntry::new("workers", "16", "Worker threads"),
        ]
    );
    assert!(cli.list_saved().unwrap().is_empty());

    stop.send(()).unwrap();
    serving.await.unwrap().unwrap();
    assert!(!config.endpoint().unwrap().exists());
}

#[test]
fn concurrent_registration_and_saves() {
    let registry = Arc::new(Registry::new());
    let store = Arc::new(app_settings::store::MemoryStore::new());
    std::thread::scope(|scope| {
        for worker in 0..8 {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                for index in 0..16 {
                    registry
                        .register_value(
                            format!("w{worker}.s{index}"),
                            "",
                            SettingCell::new(index),
                        )
                        .unwrap();
                }
            });
        }
    });
    assert_eq!(registry.len(), 128);

    let settings = Arc::new(AppSettings::new(Arc::clone(&registry), store, None));
    std::thread::scope(|scope| {
        for worker in 0..8 {
            let settings = Arc::clone(&settings);
            scope.spawn(move || {
                settings.save(&format!("w{worker}.s0"), "99").unwrap();
            });
        }
    });

    assert_eq!(settings.list_saved().unwrap().len(), 8);
    assert!(
        settings
            .list_defaults()
            .iter()
            .filter(|entry| entry.key.ends_with(".s0"))
            .all(|entry| entry.value == "0")
    );
    assert_eq!(registry.lookup("w3.s0").unwrap().get(), "99");
}
