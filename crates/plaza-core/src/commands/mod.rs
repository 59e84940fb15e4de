//! Command layer: one Options/Command/Report triple per operation.

pub mod admin_access;
pub mod configure;
pub mod context;
pub mod deploy;
pub mod fix_auth;
pub mod install;

pub use admin_access::{AdminAccessCommand, AdminAccessOptions, AdminAccessReport};
pub use configure::{
    BackendConfigureOptions, BackendConfigureReport, ConfigureCommand,
};
pub use context::DeployContext;
pub use deploy::{DeployCommand, DeployReport};
pub use fix_auth::{FixAuthCommand, auth_env_patch};
pub use install::{InstallCommand, InstallOptions, InstallReport};
