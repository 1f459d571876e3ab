//! Sample settings registered by the demo host.

use std::time::Duration;

use anyhow::Result;
use settings_registry::codec::ipnet::IpNet;
use settings_registry::codec::url::Url;
use settings_registry::codec::CronSchedule;
use settings_registry::{Registry, SettingCell};

/// Handles to the demo host's live settings.
#[derive(Debug, Clone)]
pub struct DemoSettings {
    /// Greeting printed by the host.
    pub greeting: SettingCell<String>,
    /// Port the host would listen on.
    pub port: SettingCell<u16>,
    /// Extra logging toggle.
    pub verbose: SettingCell<bool>,
    /// Timeout applied to upstream requests.
    pub request_timeout: SettingCell<Duration>,
    /// Fraction of requests traced.
    pub sample_ratio: SettingCell<f64>,
    /// Network allowed to connect.
    pub allowed_network: SettingCell<IpNet>,
    /// Upstream service.
    pub upstream: SettingCell<Url>,
    /// Cron schedule of the cleanup job.
    pub cleanup_schedule: SettingCell<String>,
    /// Labels attached to emitted events.
    pub tags: SettingCell<Vec<String>>,
}

/// Registers the demo settings with their compiled-in defaults.
///
/// # Errors
///
/// Fails when any name is already registered in `registry`.
pub fn register(registry: &Registry) -> Result<DemoSettings> {
    let settings = DemoSettings {
        greeting: SettingCell::new(String::from("hello")),
        port: SettingCell::new(8080),
        verbose: SettingCell::new(false),
        request_timeout: SettingCell::new(Duration::from_secs(30)),
        sample_ratio: SettingCell::new(0.25),
        allowed_network: SettingCell::new("10.0.0.0/8".parse()?),
        upstream: SettingCell::new(Url::parse("http://localhost:9000/")?),
        cleanup_schedule: SettingCell::new(String::from("0 30 3 * * *")),
        tags: SettingCell::new(vec![String::from("demo")]),
    };

    registry.register_value("greeting", "Greeting printed on startup", settings.greeting.clone())?;
    registry.register_value("port", "Port the service listens on", settings.port.clone())?;
    registry.register_value("verbose", "Enable verbose output", settings.verbose.clone())?;
    registry.register_value(
        "request_timeout",
        "Timeout for upstream requests",
        settings.request_timeout.clone(),
    )?;
    registry.register_value(
        "sample_ratio",
        "Fraction of requests traced",
        settings.sample_ratio.clone(),
    )?;
    registry.register_value(
        "allowed_network",
        "CIDR network allowed to connect",
        settings.allowed_network.clone(),
    )?;
    registry.register_value("upstream", "Upstream service URL", settings.upstream.clone())?;
    registry.register_typed(
        "cleanup_schedule",
        "Cron schedule of the cleanup job",
        settings.cleanup_schedule.clone(),
        CronSchedule,
    )?;
    registry.register_value("tags", "Labels attached to events", settings.tags.clone())?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_sample_setting() {
        let registry = Registry::new();
        let demo = register(&registry).unwrap();
        assert_eq!(registry.len(), 9);

        let vars = registry.vars();
        assert_eq!(vars["request_timeout"], "30s");
        assert_eq!(vars["allowed_network"], "10.0.0.0/8");
        assert_eq!(vars["upstream"], "http://localhost:9000/");

        registry.lookup("port").unwrap().set("9090").unwrap();
        assert_eq!(demo.port.get(), 9090);
        assert!(registry.lookup("cleanup_schedule").unwrap().set("every day").is_err());
        assert_eq!(demo.cleanup_schedule.get(), "0 30 3 * * *");

        assert!(register(&registry).is_err());
    }
}
