//! Generation of the `.env` files consumed by the cloned services.

use std::path::Path;

use anyhow::Context;

use crate::config::{DatabaseConfig, DeployConfig};

/// An ordered set of key=value pairs rendered one per line.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Write the rendered file, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, self.render())
            .with_context(|| format!("Failed to write env file: {}", path.display()))
    }
}

/// Backend `.env`: database URL, secrets, CORS, and search keys.
pub fn backend_env(config: &DeployConfig, db: &DatabaseConfig) -> EnvFile {
    EnvFile::new()
        .with("DATABASE_URL", db.connection_url())
        .with("NODE_ENV", "production")
        .with("JWT_SECRET", &config.secrets.jwt)
        .with("COOKIE_SECRET", &config.secrets.cookie)
        .with("SESSION_SECRET", &config.secrets.session)
        .with("ADMIN_CORS", config.cors.admin_cors())
        .with("STORE_CORS", config.cors.store_cors())
        .with("VENDOR_CORS", config.cors.vendor_cors())
        .with("AUTH_CORS", config.cors.auth_cors())
        .with("ALGOLIA_APPLICATION_ID", &config.search.application_id)
        .with("ALGOLIA_WRITE_API_KEY", &config.search.write_api_key)
        .with("ALGOLIA_SEARCH_API_KEY", &config.search.search_api_key)
}

/// Storefront `.env`: backend URL, publishable key, region, search keys.
pub fn storefront_env(config: &DeployConfig, publishable_key: &str) -> EnvFile {
    let backend_url = config.cluster.backend_url();
    EnvFile::new()
        .with("MEDUSA_BACKEND_URL", &backend_url)
        .with("NEXT_PUBLIC_MEDUSA_BACKEND_URL", &backend_url)
        .with("NEXT_PUBLIC_MEDUSA_PUBLISHABLE_KEY", publishable_key)
        .with("NEXT_PUBLIC_DEFAULT_REGION", &config.defaults.region)
        .with(
            "NEXT_PUBLIC_ALGOLIA_APPLICATION_ID",
            &config.search.application_id,
        )
        .with(
            "NEXT_PUBLIC_ALGOLIA_SEARCH_API_KEY",
            &config.search.search_api_key,
        )
}

/// Vendor panel `.env`: backend URL plus search keys.
pub fn vendor_panel_env(config: &DeployConfig) -> EnvFile {
    EnvFile::new()
        .with("VITE_MEDUSA_BACKEND_URL", config.cluster.backend_url())
        .with("VITE_ALGOLIA_APPLICATION_ID", &config.search.application_id)
        .with("VITE_ALGOLIA_SEARCH_API_KEY", &config.search.search_api_key)
        .with("VITE_ALGOLIA_ADMIN_API_KEY", &config.search.admin_api_key)
}
