//! Deploy context wiring configuration and the process runner together.

use std::sync::Arc;

use crate::config::{ConfigStore, DeployConfig, DeployPaths};
use crate::kube::Kubectl;
use crate::process::{CommandRunner, SystemRunner};

use super::admin_access::AdminAccessCommand;
use super::configure::ConfigureCommand;
use super::deploy::DeployCommand;
use super::fix_auth::FixAuthCommand;
use super::install::InstallCommand;

/// Owns the immutable configuration and the command runner; hands out
/// command instances borrowing both.
pub struct DeployContext {
    config: DeployConfig,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for DeployContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DeployContext {
    pub fn new(config: DeployConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Discover the deployment root, merge `plaza.toml` overrides, and run
    /// against the real system.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let paths = DeployPaths::discover()?;
        Self::from_paths(paths)
    }

    /// Build a context for an explicit deployment root.
    pub fn from_paths(paths: DeployPaths) -> anyhow::Result<Self> {
        let store = ConfigStore::from_deployment_root(paths.deployment_root());
        let mut config = DeployConfig::with_defaults(paths);
        store.load_into(&mut config)?;
        config.validate()?;
        Ok(Self::new(config, Arc::new(SystemRunner)))
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        self.runner.clone()
    }

    /// kubectl handle bound to the configured namespace.
    pub fn kubectl(&self) -> Kubectl {
        Kubectl::new(self.runner.clone(), self.config.kubernetes.namespace.clone())
    }

    // --- Command factories ---

    pub fn install(&self) -> InstallCommand<'_> {
        InstallCommand::new(&self.config, self.runner.clone())
    }

    pub fn configure(&self) -> ConfigureCommand<'_> {
        ConfigureCommand::new(&self.config, self.runner.clone())
    }

    pub fn deploy(&self) -> DeployCommand<'_> {
        DeployCommand::new(&self.config, self.runner.clone())
    }

    pub fn admin_access(&self) -> AdminAccessCommand<'_> {
        AdminAccessCommand::new(&self.config, self.runner.clone())
    }

    pub fn fix_auth(&self) -> FixAuthCommand<'_> {
        FixAuthCommand::new(&self.config, self.runner.clone())
    }
}
