//! Thin kubectl wrapper over the command runner.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::process::{CommandRunner, CommandSpec};

/// Issues `kubectl` commands against a fixed namespace.
pub struct Kubectl {
    runner: Arc<dyn CommandRunner>,
    namespace: String,
}

impl Kubectl {
    pub fn new(runner: Arc<dyn CommandRunner>, namespace: impl Into<String>) -> Self {
        Self {
            runner,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `kubectl apply -f <path>` for a single manifest or a directory.
    pub fn apply(&self, path: &Path) -> anyhow::Result<()> {
        let spec = CommandSpec::new("kubectl").args(["apply", "-f"]).arg(
            path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Manifest path is not valid UTF-8"))?,
        );
        self.runner
            .run(&spec)
            .with_context(|| format!("Failed to apply manifests from {}", path.display()))?;
        Ok(())
    }

    /// Wait until every deployment in the namespace is available.
    pub fn wait_all_available(&self, timeout: &str) -> anyhow::Result<()> {
        let spec = CommandSpec::new("kubectl").args([
            "wait",
            "--for=condition=available",
            "deployment",
            "--all",
            "-n",
            &self.namespace,
            &format!("--timeout={timeout}"),
        ]);
        self.runner
            .run(&spec)
            .context("Deployments did not become available")?;
        Ok(())
    }

    /// JSON merge patch against a deployment.
    pub fn patch_deployment_merge(
        &self,
        deployment: &str,
        patch: &serde_json::Value,
    ) -> anyhow::Result<()> {
        let spec = CommandSpec::new("kubectl").args([
            "patch",
            "deployment",
            deployment,
            "-n",
            &self.namespace,
            "--type=merge",
            "-p",
            &patch.to_string(),
        ]);
        self.runner
            .run(&spec)
            .with_context(|| format!("Failed to patch deployment {deployment}"))?;
        Ok(())
    }

    pub fn rollout_status(&self, deployment: &str, timeout: &str) -> anyhow::Result<()> {
        let spec = CommandSpec::new("kubectl").args([
            "rollout",
            "status",
            &format!("deployment/{deployment}"),
            "-n",
            &self.namespace,
            &format!("--timeout={timeout}"),
        ]);
        self.runner
            .run(&spec)
            .with_context(|| format!("Rollout of {deployment} did not complete"))?;
        Ok(())
    }

    /// Start a background port-forward to a deployment.
    pub fn port_forward_detached(
        &self,
        deployment: &str,
        local_port: u16,
        remote_port: u16,
    ) -> anyhow::Result<()> {
        let spec = CommandSpec::new("kubectl").args([
            "port-forward",
            "-n",
            &self.namespace,
            &format!("deployment/{deployment}"),
            &format!("{local_port}:{remote_port}"),
        ]);
        self.runner
            .spawn_detached(&spec)
            .with_context(|| format!("Failed to start port-forward to {deployment}"))?;
        Ok(())
    }

    /// Kill stale port-forward processes for a deployment.
    ///
    /// pkill exits non-zero when nothing matched, which is not an error.
    pub fn kill_stale_port_forwards(&self, deployment: &str) {
        let pattern = format!("kubectl.*port-forward.*{deployment}");
        let spec = CommandSpec::new("pkill").args(["-f", &pattern]);
        if self.runner.run(&spec).is_err() {
            tracing::debug!(deployment, "no stale port-forward to kill");
        }
    }
}
