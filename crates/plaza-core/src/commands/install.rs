//! Install command: clone the service repositories and install their
//! package dependencies.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::DeployConfig;
use crate::process::{CommandRunner, CommandSpec};

/// Options for the install command.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Project directory name under the projects root.
    pub directory: String,
    pub install_storefront: bool,
    pub install_vendor_panel: bool,
}

impl InstallOptions {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            install_storefront: true,
            install_vendor_panel: true,
        }
    }

    pub fn with_storefront(mut self, install: bool) -> Self {
        self.install_storefront = install;
        self
    }

    pub fn with_vendor_panel(mut self, install: bool) -> Self {
        self.install_vendor_panel = install;
        self
    }
}

/// Report from an install operation.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Root directory the project was created in.
    pub project_dir: PathBuf,
    /// Component directory names that were cloned and installed.
    pub components: Vec<String>,
}

/// Clones repositories into the project directory and runs `npm install`
/// in each. Any failure aborts; there is no retry or rollback.
pub struct InstallCommand<'a> {
    config: &'a DeployConfig,
    runner: Arc<dyn CommandRunner>,
}

impl<'a> InstallCommand<'a> {
    pub fn new(config: &'a DeployConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn execute(&self, options: &InstallOptions) -> anyhow::Result<InstallReport> {
        let project_dir = self.config.paths.project_path(&options.directory);
        std::fs::create_dir_all(&project_dir).with_context(|| {
            format!("Failed to create project directory: {}", project_dir.display())
        })?;

        let mut components = Vec::new();

        self.clone_and_install(&project_dir, self.config.repositories.backend.as_str(), "backend")?;
        components.push("backend".to_string());

        if options.install_storefront {
            self.clone_and_install(
                &project_dir,
                self.config.repositories.storefront.as_str(),
                "storefront",
            )?;
            components.push("storefront".to_string());
        }

        if options.install_vendor_panel {
            self.clone_and_install(
                &project_dir,
                self.config.repositories.vendor_panel.as_str(),
                "vendor-panel",
            )?;
            components.push("vendor-panel".to_string());
        }

        Ok(InstallReport {
            project_dir,
            components,
        })
    }

    fn clone_and_install(
        &self,
        project_dir: &std::path::Path,
        repo_url: &str,
        dir_name: &str,
    ) -> anyhow::Result<()> {
        info!(component = dir_name, repo = repo_url, "cloning");
        self.runner
            .run(
                &CommandSpec::new("git")
                    .args(["clone", repo_url, dir_name])
                    .current_dir(project_dir),
            )
            .with_context(|| format!("Failed to clone {dir_name} from {repo_url}"))?;

        info!(component = dir_name, "installing dependencies");
        self.runner
            .run(
                &CommandSpec::new("npm")
                    .arg("install")
                    .current_dir(project_dir.join(dir_name)),
            )
            .with_context(|| format!("Failed to install dependencies for {dir_name}"))?;
        Ok(())
    }
}
