//! Loading `plaza.toml` overrides from the deployment root.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use super::{DatabaseConfig, DeployConfig, Login};

/// Partial override for the cluster section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterOverrides {
    pub server: Option<String>,
    pub backend_node_port: Option<u16>,
    pub storefront_node_port: Option<u16>,
    pub vendor_panel_node_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsOverrides {
    pub admin: Option<Login>,
    pub vendor: Option<Login>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KubernetesOverrides {
    pub namespace: Option<String>,
}

/// Overrides deserialized from `plaza.toml`.
///
/// Only the sections an operator plausibly needs to change are exposed;
/// everything absent keeps its compiled-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub cluster: ClusterOverrides,
    #[serde(default)]
    pub credentials: CredentialsOverrides,
    #[serde(default)]
    pub kubernetes: KubernetesOverrides,
}

impl ConfigOverrides {
    /// Merge these overrides onto a configuration.
    pub fn apply(self, config: &mut DeployConfig) {
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(server) = self.cluster.server {
            config.cluster.server = server;
        }
        if let Some(port) = self.cluster.backend_node_port {
            config.cluster.backend_node_port = port;
        }
        if let Some(port) = self.cluster.storefront_node_port {
            config.cluster.storefront_node_port = port;
        }
        if let Some(port) = self.cluster.vendor_panel_node_port {
            config.cluster.vendor_panel_node_port = port;
        }
        if let Some(admin) = self.credentials.admin {
            config.credentials.admin = admin;
        }
        if let Some(vendor) = self.credentials.vendor {
            config.credentials.vendor = vendor;
        }
        if let Some(namespace) = self.kubernetes.namespace {
            config.kubernetes.namespace = namespace;
        }
    }
}

/// Reads `plaza.toml` from the deployment root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn from_deployment_root(root: &Path) -> Self {
        Self {
            config_path: root.join("plaza.toml"),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load overrides; a missing file means no overrides.
    pub fn load(&self) -> anyhow::Result<ConfigOverrides> {
        if !self.config_path.exists() {
            return Ok(ConfigOverrides::default());
        }
        let content = std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read {}", self.config_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.config_path.display()))
    }

    /// Load overrides and apply them onto `config`.
    pub fn load_into(&self, config: &mut DeployConfig) -> anyhow::Result<()> {
        self.load()?.apply(config);
        Ok(())
    }
}
