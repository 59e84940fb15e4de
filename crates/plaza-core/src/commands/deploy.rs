//! Deploy command: apply Kubernetes manifests and wait for readiness.

use std::sync::Arc;

use tracing::info;

use crate::config::DeployConfig;
use crate::kube::Kubectl;
use crate::process::CommandRunner;

/// How long `kubectl wait` blocks on deployment availability.
const DEPLOY_WAIT_TIMEOUT: &str = "300s";

/// Report from a deploy operation.
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub admin_url: String,
    pub storefront_url: String,
    pub vendor_panel_url: String,
}

/// Applies the manifests under `k8s/` and waits for all deployments.
pub struct DeployCommand<'a> {
    config: &'a DeployConfig,
    runner: Arc<dyn CommandRunner>,
}

impl<'a> DeployCommand<'a> {
    pub fn new(config: &'a DeployConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn execute(&self) -> anyhow::Result<DeployReport> {
        let kubectl = Kubectl::new(
            self.runner.clone(),
            self.config.kubernetes.namespace.clone(),
        );
        let k8s_dir = self.config.paths.k8s_dir();

        info!("creating namespace");
        kubectl.apply(&k8s_dir.join("namespace.yaml"))?;

        info!("deploying components");
        kubectl.apply(&k8s_dir)?;

        info!("waiting for deployments");
        kubectl.wait_all_available(DEPLOY_WAIT_TIMEOUT)?;

        Ok(DeployReport {
            admin_url: self.config.cluster.admin_url(),
            storefront_url: self.config.cluster.storefront_url(),
            vendor_panel_url: self.config.cluster.vendor_panel_url(),
        })
    }
}
