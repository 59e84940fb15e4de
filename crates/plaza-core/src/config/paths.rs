//! Deployment path resolution helpers.

use std::path::{Path, PathBuf};

/// Filesystem layout of a plaza deployment checkout.
///
/// The deployment root is the checkout containing `k8s/` and the `plaza`
/// binary (under `bin/`); cloned project sources live one level above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPaths {
    deployment_root: PathBuf,
    projects_root: PathBuf,
}

impl DeployPaths {
    /// Build paths from an explicit deployment root.
    pub fn from_deployment_root(root: impl Into<PathBuf>) -> Self {
        let deployment_root: PathBuf = root.into();
        let projects_root = deployment_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| deployment_root.clone());
        Self {
            deployment_root,
            projects_root,
        }
    }

    /// Discover the deployment root from the running executable.
    ///
    /// The binary is expected at `<root>/bin/plaza`.
    pub fn discover() -> anyhow::Result<Self> {
        let exe = std::env::current_exe()?;
        let bin_dir = exe
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Executable has no parent directory"))?;
        let root = bin_dir.parent().ok_or_else(|| {
            anyhow::anyhow!(
                "Cannot determine deployment root from {}",
                bin_dir.display()
            )
        })?;
        Ok(Self::from_deployment_root(root))
    }

    pub fn deployment_root(&self) -> &Path {
        &self.deployment_root
    }

    pub fn projects_root(&self) -> &Path {
        &self.projects_root
    }

    /// Directory holding the Kubernetes manifests.
    pub fn k8s_dir(&self) -> PathBuf {
        self.deployment_root.join("k8s")
    }

    /// Root directory of a cloned project.
    pub fn project_path(&self, project_name: &str) -> PathBuf {
        self.projects_root.join(project_name)
    }

    /// Checkout directory of the backend repository.
    pub fn backend_repo_path(&self, project_name: &str) -> PathBuf {
        self.project_path(project_name).join("backend")
    }

    /// The backend application itself (a workspace member inside the repo).
    pub fn backend_app_path(&self, project_name: &str) -> PathBuf {
        self.backend_repo_path(project_name)
            .join("apps")
            .join("backend")
    }

    pub fn storefront_path(&self, project_name: &str) -> PathBuf {
        self.project_path(project_name).join("storefront")
    }

    pub fn vendor_panel_path(&self, project_name: &str) -> PathBuf {
        self.project_path(project_name).join("vendor-panel")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_root_is_parent_of_deployment_root() {
        let paths = DeployPaths::from_deployment_root("/srv/deploy/plaza");
        assert_eq!(paths.deployment_root(), Path::new("/srv/deploy/plaza"));
        assert_eq!(paths.projects_root(), Path::new("/srv/deploy"));
    }

    #[test]
    fn backend_app_lives_inside_repo_checkout() {
        let paths = DeployPaths::from_deployment_root("/srv/deploy/plaza");
        assert_eq!(
            paths.backend_app_path("demo"),
            Path::new("/srv/deploy/demo/backend/apps/backend")
        );
    }

    #[test]
    fn k8s_dir_under_deployment_root() {
        let paths = DeployPaths::from_deployment_root("/srv/deploy/plaza");
        assert_eq!(paths.k8s_dir(), Path::new("/srv/deploy/plaza/k8s"));
    }
}
