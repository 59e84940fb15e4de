//! Configure commands: write service `.env` files and run the framework
//! CLI database steps for the backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::{DatabaseConfig, DeployConfig};
use crate::env_file::{backend_env, storefront_env, vendor_panel_env};
use crate::process::{CommandRunner, CommandSpec};

/// Options for backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfigureOptions {
    pub directory: String,
    /// Database settings; `None` uses the configured default database.
    pub database: Option<DatabaseConfig>,
}

impl BackendConfigureOptions {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: DatabaseConfig) -> Self {
        self.database = Some(database);
        self
    }
}

/// Report from backend configuration.
#[derive(Debug, Clone)]
pub struct BackendConfigureReport {
    pub env_path: PathBuf,
    /// Publishable key the storefront needs.
    pub publishable_key: String,
    /// Database setup problems downgraded to warnings.
    pub warnings: Vec<String>,
}

/// Writes `.env` files for the three services and runs database setup.
pub struct ConfigureCommand<'a> {
    config: &'a DeployConfig,
    runner: Arc<dyn CommandRunner>,
}

impl<'a> ConfigureCommand<'a> {
    pub fn new(config: &'a DeployConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// Write the backend `.env` and run database create/migrate/admin-user.
    ///
    /// Database failures do not abort configuration: the first failing step
    /// stops the database sequence and is reported as a warning.
    pub fn backend(
        &self,
        options: &BackendConfigureOptions,
    ) -> anyhow::Result<BackendConfigureReport> {
        let db = options
            .database
            .clone()
            .unwrap_or_else(|| self.config.database.clone());
        let backend_dir = self.config.paths.backend_app_path(&options.directory);
        let env_path = backend_dir.join(".env");

        info!(path = %env_path.display(), "writing backend environment");
        backend_env(self.config, &db).write_to(&env_path)?;

        let mut warnings = Vec::new();
        if let Err(err) = self.run_database_setup(&backend_dir, &db) {
            warn!(error = %err, "database setup had issues, continuing");
            warnings.push(format!("Database setup had issues, continuing: {err:#}"));
        }

        Ok(BackendConfigureReport {
            env_path,
            publishable_key: self.config.secrets.publishable_key.clone(),
            warnings,
        })
    }

    /// Write the storefront `.env`. Returns the path written.
    pub fn storefront(&self, directory: &str, publishable_key: &str) -> anyhow::Result<PathBuf> {
        let env_path = self.config.paths.storefront_path(directory).join(".env");
        info!(path = %env_path.display(), "writing storefront environment");
        storefront_env(self.config, publishable_key).write_to(&env_path)?;
        Ok(env_path)
    }

    /// Write the vendor panel `.env`. Returns the path written.
    pub fn vendor_panel(&self, directory: &str) -> anyhow::Result<PathBuf> {
        let env_path = self.config.paths.vendor_panel_path(directory).join(".env");
        info!(path = %env_path.display(), "writing vendor panel environment");
        vendor_panel_env(self.config).write_to(&env_path)?;
        Ok(env_path)
    }

    fn run_database_setup(&self, backend_dir: &Path, db: &DatabaseConfig) -> anyhow::Result<()> {
        let admin = &self.config.credentials.admin;

        self.medusa(backend_dir, &["db:create", "--db", &db.name])
            .context("db:create failed")?;
        self.medusa(backend_dir, &["db:migrate"])
            .context("db:migrate failed")?;
        self.medusa(
            backend_dir,
            &[
                "user:create",
                "--email",
                &admin.email,
                "--password",
                &admin.password,
            ],
        )
        .context("user:create failed")?;
        Ok(())
    }

    fn medusa(&self, backend_dir: &Path, args: &[&str]) -> anyhow::Result<()> {
        let spec = CommandSpec::new("npx")
            .arg("medusa")
            .args(args.iter().copied())
            .current_dir(backend_dir)
            .inherit_stdio();
        self.runner.run(&spec)?;
        Ok(())
    }
}
