//! Plaza Core Library
//!
//! Domain logic for the plaza deployment CLI: configuration model,
//! process-runner seam, env-file generation, kubectl wrapper, and the
//! command layer for install/configure/deploy operations.

pub mod commands;
pub mod config;
pub mod env_file;
pub mod kube;
pub mod process;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{
        ClusterEndpoints, ConfigOverrides, ConfigStore, CorsConfig, Credentials, DatabaseConfig,
        DeployConfig, DeployPaths, KubernetesConfig, Login, ProjectDefaults, Repositories,
        SearchKeys, Secrets, ServiceSpec,
    };

    // Process execution
    pub use crate::process::{
        CommandOutput, CommandRunner, CommandSpec, ProcessError, SystemRunner,
    };

    // Environment files
    pub use crate::env_file::{EnvFile, backend_env, storefront_env, vendor_panel_env};

    // Commands
    pub use crate::commands::{
        AdminAccessCommand, AdminAccessOptions, AdminAccessReport, BackendConfigureOptions,
        BackendConfigureReport, ConfigureCommand, DeployCommand, DeployContext, DeployReport,
        FixAuthCommand, InstallCommand, InstallOptions, InstallReport,
    };

    // Kubernetes
    pub use crate::kube::Kubectl;
}
