//! Deployment configuration model.
//!
//! `DeployConfig` is an immutable value constructed once at startup and
//! passed by reference to every command. Compiled-in defaults describe the
//! standard marketplace deployment; `plaza.toml` in the deployment root may
//! override the sensitive parts (see [`store::ConfigStore`]).

mod paths;
pub mod store;

use serde::Deserialize;
use url::Url;

pub use paths::DeployPaths;
pub use store::{ConfigOverrides, ConfigStore};

/// Clone sources for the three marketplace services.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub backend: Url,
    pub storefront: Url,
    pub vendor_panel: Url,
}

/// Postgres connection settings.
///
/// The port is kept as a string: it is only ever substituted into the
/// connection URL and environment templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    /// Connection URL in the form the backend expects.
    pub fn connection_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}?sslmode=require",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// Externally reachable cluster address and per-service node ports.
#[derive(Debug, Clone)]
pub struct ClusterEndpoints {
    pub server: String,
    pub backend_node_port: u16,
    pub storefront_node_port: u16,
    pub vendor_panel_node_port: u16,
}

impl ClusterEndpoints {
    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.server, self.backend_node_port)
    }

    pub fn storefront_url(&self) -> String {
        format!("http://{}:{}", self.server, self.storefront_node_port)
    }

    pub fn vendor_panel_url(&self) -> String {
        format!("http://{}:{}", self.server, self.vendor_panel_node_port)
    }

    /// Admin panel is served by the backend under `/app`.
    pub fn admin_url(&self) -> String {
        format!("{}/app", self.backend_url())
    }
}

/// Allowed origins per surface, joined into the comma-separated strings
/// the backend consumes.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub admin: Vec<String>,
    pub store: Vec<String>,
    pub vendor: Vec<String>,
}

impl CorsConfig {
    pub fn admin_cors(&self) -> String {
        self.admin.join(",")
    }

    pub fn store_cors(&self) -> String {
        self.store.join(",")
    }

    pub fn vendor_cors(&self) -> String {
        self.vendor.join(",")
    }

    /// Auth accepts every origin any surface accepts.
    pub fn auth_cors(&self) -> String {
        self.admin
            .iter()
            .chain(&self.store)
            .chain(&self.vendor)
            .cloned()
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Backend secrets and the storefront publishable API key.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub jwt: String,
    pub cookie: String,
    pub session: String,
    pub publishable_key: String,
}

/// Algolia keys consumed by the generated environment files.
#[derive(Debug, Clone)]
pub struct SearchKeys {
    pub application_id: String,
    pub write_api_key: String,
    pub search_api_key: String,
    pub admin_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Default logins created/printed by the setup flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub admin: Login,
    pub admin_alt: Login,
    pub vendor: Login,
}

/// A deployed service: Kubernetes service name plus its in-cluster and
/// node ports.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub port: u16,
    pub node_port: u16,
}

#[derive(Debug, Clone)]
pub struct KubernetesConfig {
    pub namespace: String,
    pub backend_deployment: String,
    pub storefront_deployment: String,
    pub vendor_panel_deployment: String,
    pub backend_service: ServiceSpec,
    pub storefront_service: ServiceSpec,
    pub vendor_panel_service: ServiceSpec,
}

/// Defaults offered by the interactive flow and used by `plaza test`.
#[derive(Debug, Clone)]
pub struct ProjectDefaults {
    pub project_name: String,
    pub install_storefront: bool,
    pub install_vendor_panel: bool,
    pub use_existing_db: bool,
    pub region: String,
}

/// Immutable deployment configuration.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub paths: DeployPaths,
    pub repositories: Repositories,
    pub database: DatabaseConfig,
    pub cluster: ClusterEndpoints,
    pub cors: CorsConfig,
    pub secrets: Secrets,
    pub search: SearchKeys,
    pub credentials: Credentials,
    pub kubernetes: KubernetesConfig,
    pub defaults: ProjectDefaults,
}

impl DeployConfig {
    /// Compiled-in defaults for the standard marketplace deployment.
    pub fn with_defaults(paths: DeployPaths) -> Self {
        let server = "203.0.113.10".to_string();
        Self {
            paths,
            repositories: Repositories {
                backend: parse_default_url("https://github.com/plaza-io/plaza-backend.git"),
                storefront: parse_default_url("https://github.com/plaza-io/plaza-storefront.git"),
                vendor_panel: parse_default_url(
                    "https://github.com/plaza-io/plaza-vendor-panel.git",
                ),
            },
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: "5432".to_string(),
                user: "postgres".to_string(),
                password: "postgres".to_string(),
                name: "plaza".to_string(),
            },
            cluster: ClusterEndpoints {
                server: server.clone(),
                backend_node_port: 30900,
                storefront_node_port: 30800,
                vendor_panel_node_port: 30701,
            },
            cors: CorsConfig {
                admin: vec![
                    format!("http://{server}:30900"),
                    "http://localhost:7000".to_string(),
                    "https://admin.stage-marketplace.plaza.io".to_string(),
                ],
                store: vec![
                    format!("http://{server}:30800"),
                    "http://localhost:8000".to_string(),
                    "https://stage-marketplace.plaza.io".to_string(),
                ],
                vendor: vec![
                    format!("http://{server}:30701"),
                    "http://localhost:7001".to_string(),
                ],
            },
            secrets: Secrets {
                jwt: "plaza-marketplace-jwt-secret".to_string(),
                cookie: "plaza-marketplace-cookie-secret".to_string(),
                session: "plaza-marketplace-session-secret".to_string(),
                publishable_key:
                    "pk_9c115fbcbef63283d5798789c01268ca875f59d5b1a009478d925905ef07b28e"
                        .to_string(),
            },
            search: SearchKeys {
                application_id: "PLZ0EXAMPLE".to_string(),
                write_api_key: "562a4b2e30ee05141f8627713d1fca0d".to_string(),
                search_api_key: "b145a6fd75d9b6a148a7ba0e6a92c993".to_string(),
                admin_api_key: "fcc282b0e323e896e2f00f5e30ec9903".to_string(),
            },
            credentials: Credentials {
                admin: Login {
                    email: "admin@example.com".to_string(),
                    password: "password123".to_string(),
                },
                admin_alt: Login {
                    email: "admin@plaza.io".to_string(),
                    password: "admin123".to_string(),
                },
                vendor: Login {
                    email: "seller@plaza.io".to_string(),
                    password: "secret".to_string(),
                },
            },
            kubernetes: KubernetesConfig {
                namespace: "plaza-marketplace".to_string(),
                backend_deployment: "plaza-backend".to_string(),
                storefront_deployment: "plaza-storefront".to_string(),
                vendor_panel_deployment: "plaza-vendor-panel".to_string(),
                backend_service: ServiceSpec {
                    name: "plaza-backend-service".to_string(),
                    port: 9000,
                    node_port: 30900,
                },
                storefront_service: ServiceSpec {
                    name: "plaza-storefront-service".to_string(),
                    port: 3000,
                    node_port: 30800,
                },
                vendor_panel_service: ServiceSpec {
                    name: "plaza-vendor-panel-service".to_string(),
                    port: 3000,
                    node_port: 30701,
                },
            },
            defaults: ProjectDefaults {
                project_name: "plaza-marketplace".to_string(),
                install_storefront: true,
                install_vendor_panel: true,
                use_existing_db: true,
                region: "us".to_string(),
            },
        }
    }

    /// Reject configurations with empty required fields.
    pub fn validate(&self) -> anyhow::Result<()> {
        let required = [
            ("database.host", &self.database.host),
            ("database.port", &self.database.port),
            ("database.user", &self.database.user),
            ("database.password", &self.database.password),
            ("database.name", &self.database.name),
            ("cluster.server", &self.cluster.server),
            ("secrets.jwt", &self.secrets.jwt),
            ("secrets.cookie", &self.secrets.cookie),
            ("secrets.session", &self.secrets.session),
            ("secrets.publishable_key", &self.secrets.publishable_key),
            ("credentials.admin.email", &self.credentials.admin.email),
            (
                "credentials.admin.password",
                &self.credentials.admin.password,
            ),
            ("kubernetes.namespace", &self.kubernetes.namespace),
            (
                "kubernetes.backend_deployment",
                &self.kubernetes.backend_deployment,
            ),
            ("defaults.project_name", &self.defaults.project_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("Configuration field must not be empty: {}", field);
            }
        }
        Ok(())
    }
}

fn parse_default_url(url: &str) -> Url {
    // Compiled-in literals; a parse failure here is a programming error.
    Url::parse(url).unwrap_or_else(|err| panic!("invalid default url {url}: {err}"))
}
