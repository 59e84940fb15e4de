//! Admin access command: port-forward to the backend and verify the admin
//! panel is reachable.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::kube::Kubectl;
use crate::process::{CommandRunner, CommandSpec};

/// Options for the admin access command.
#[derive(Debug, Clone)]
pub struct AdminAccessOptions {
    pub local_port: u16,
    /// Delay before the first reachability probe.
    pub startup_wait: Duration,
    /// Delay before the single retry probe.
    pub retry_wait: Duration,
}

impl Default for AdminAccessOptions {
    fn default() -> Self {
        Self {
            local_port: 8080,
            startup_wait: Duration::from_secs(3),
            retry_wait: Duration::from_secs(2),
        }
    }
}

impl AdminAccessOptions {
    pub fn with_local_port(mut self, port: u16) -> Self {
        self.local_port = port;
        self
    }

    /// Zero waits, for tests.
    pub fn without_waits(mut self) -> Self {
        self.startup_wait = Duration::ZERO;
        self.retry_wait = Duration::ZERO;
        self
    }
}

/// Report from an admin access operation.
#[derive(Debug, Clone)]
pub struct AdminAccessReport {
    /// Local URL of the admin panel.
    pub url: String,
    /// Whether the probe reached the panel.
    pub reachable: bool,
    pub warnings: Vec<String>,
}

/// Kills stale port-forwards, starts a fresh one, and probes the panel.
///
/// An unreachable panel is a warning, not an error: the forward may still
/// come up after the command returns.
pub struct AdminAccessCommand<'a> {
    config: &'a DeployConfig,
    runner: Arc<dyn CommandRunner>,
}

impl<'a> AdminAccessCommand<'a> {
    pub fn new(config: &'a DeployConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn execute(&self, options: &AdminAccessOptions) -> anyhow::Result<AdminAccessReport> {
        let kube = &self.config.kubernetes;
        let kubectl = Kubectl::new(self.runner.clone(), kube.namespace.clone());

        kubectl.kill_stale_port_forwards(&kube.backend_deployment);
        kubectl.port_forward_detached(
            &kube.backend_deployment,
            options.local_port,
            kube.backend_service.port,
        )?;

        std::thread::sleep(options.startup_wait);

        let url = format!("http://localhost:{}/app", options.local_port);
        info!(%url, "probing admin panel");
        let mut reachable = self.probe(&url);
        if !reachable {
            std::thread::sleep(options.retry_wait);
            reachable = self.probe(&url);
        }

        let mut warnings = Vec::new();
        if !reachable {
            warn!(%url, "admin panel not reachable");
            warnings.push(format!(
                "Connection issues reaching {url}. Check kubectl port-forward manually."
            ));
        }

        Ok(AdminAccessReport {
            url,
            reachable,
            warnings,
        })
    }

    fn probe(&self, url: &str) -> bool {
        self.runner
            .run(&CommandSpec::new("curl").args(["-s", url]))
            .is_ok()
    }
}
