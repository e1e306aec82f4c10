use crate::checks::{Check, FileCheck, TcpCheck, UrlCheck};
use crate::config::Config;
use crate::periodic::PeriodicThresholdChecker;
use crate::registry::Registry;
use crate::status::HealthStatus;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/// A configured check together with how often it runs and how many failures
/// in a row it takes to report it.
struct Plugin {
    name: &'static str,
    interval: Duration,
    threshold: usize,
    check: Arc<dyn Check>,
}

/// Builds the checks enabled in the configuration and runs them.
pub struct PluginManager {
    plugins: Vec<Plugin>,
    running: Vec<Arc<PeriodicThresholdChecker>>,
}

impl PluginManager {
    pub fn new(config: &Config) -> Self {
        Self {
            plugins: create_plugins(config),
            running: Vec::new(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name).collect()
    }

    /// Registers every check in `registry` as a periodic threshold check.
    pub fn monitor(&mut self, registry: &Registry) {
        for plugin in &self.plugins {
            debug!(
                "Monitoring {} every {:?}, threshold {}",
                plugin.name, plugin.interval, plugin.threshold
            );
            let checker = Arc::new(PeriodicThresholdChecker::new(
                plugin.check.clone(),
                plugin.interval,
                plugin.threshold,
            ));
            registry.register(plugin.name, checker.clone());
            self.running.push(checker);
        }
        info!("Monitoring {} checks", self.running.len());
    }

    /// Stops the background tasks started by [`PluginManager::monitor`].
    pub fn stop(&mut self) {
        for checker in self.running.drain(..) {
            checker.stop();
        }
    }

    /// Runs every check once and returns the combined result.
    pub async fn quick_check(&self) -> HealthStatus {
        debug!("Running quick checks");
        let registry = Registry::new();
        for plugin in &self.plugins {
            registry.register(plugin.name, plugin.check.clone());
        }
        registry.check_status().await
    }
}

fn create_plugins(config: &Config) -> Vec<Plugin> {
    let mut plugins = Vec::new();

    let file_check = FileCheck::new(config);
    if file_check.is_enabled() {
        plugins.push(Plugin {
            name: "FileCheck",
            interval: Duration::from_secs(config.checks.file_check.interval),
            threshold: config.checks.file_check.threshold,
            check: Arc::new(file_check),
        });
    }

    let url_check = UrlCheck::new(config);
    if url_check.is_enabled() {
        plugins.push(Plugin {
            name: "UrlCheck",
            interval: Duration::from_secs(config.checks.url_check.interval),
            threshold: config.checks.url_check.threshold,
            check: Arc::new(url_check),
        });
    }

    let tcp_check = TcpCheck::new(config);
    if tcp_check.is_enabled() {
        plugins.push(Plugin {
            name: "TcpCheck",
            interval: Duration::from_secs(config.checks.tcp_check.interval),
            threshold: config.checks.tcp_check.threshold,
            check: Arc::new(tcp_check),
        });
    }

    plugins
}
