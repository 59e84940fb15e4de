//! Fix-auth command: patch session/CORS environment variables into the
//! backend deployment and wait for the rollout.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::config::DeployConfig;
use crate::kube::Kubectl;
use crate::process::CommandRunner;

const ROLLOUT_TIMEOUT: &str = "60s";

/// JSON merge patch adding the auth-related environment variables to the
/// backend container.
pub fn auth_env_patch(config: &DeployConfig) -> serde_json::Value {
    let env_var = |name: &str, value: String| json!({ "name": name, "value": value });
    json!({
        "spec": {
            "template": {
                "spec": {
                    "containers": [{
                        "name": "backend",
                        "env": [
                            env_var("SESSION_SECRET", config.secrets.session.clone()),
                            env_var("COOKIE_SECRET", config.secrets.cookie.clone()),
                            env_var("MEDUSA_ADMIN_ONBOARDING_TYPE", "default".to_string()),
                            env_var("MEDUSA_ADMIN_ONBOARDING_FLOW", "invite_only".to_string()),
                            env_var("STORE_CORS", config.cors.store_cors()),
                            env_var("ADMIN_CORS", config.cors.admin_cors()),
                            env_var("AUTH_CORS", config.cors.auth_cors()),
                        ]
                    }]
                }
            }
        }
    })
}

/// Applies the auth environment patch and waits for the backend rollout.
pub struct FixAuthCommand<'a> {
    config: &'a DeployConfig,
    runner: Arc<dyn CommandRunner>,
}

impl<'a> FixAuthCommand<'a> {
    pub fn new(config: &'a DeployConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        let kube = &self.config.kubernetes;
        let kubectl = Kubectl::new(self.runner.clone(), kube.namespace.clone());

        info!(deployment = %kube.backend_deployment, "patching auth environment");
        let patch = auth_env_patch(self.config);
        kubectl.patch_deployment_merge(&kube.backend_deployment, &patch)?;

        info!("waiting for rollout");
        kubectl.rollout_status(&kube.backend_deployment, ROLLOUT_TIMEOUT)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeployPaths;

    #[test]
    fn patch_targets_backend_container() {
        let config =
            DeployConfig::with_defaults(DeployPaths::from_deployment_root("/srv/deploy/plaza"));
        let patch = auth_env_patch(&config);
        let container = &patch["spec"]["template"]["spec"]["containers"][0];
        assert_eq!(container["name"], "backend");

        let env = container["env"].as_array().unwrap();
        let names: Vec<_> = env.iter().map(|e| e["name"].as_str().unwrap()).collect();
        assert!(names.contains(&"SESSION_SECRET"));
        assert!(names.contains(&"AUTH_CORS"));
        assert!(names.contains(&"MEDUSA_ADMIN_ONBOARDING_FLOW"));
    }

    #[test]
    fn patch_carries_configured_cors_strings() {
        let config =
            DeployConfig::with_defaults(DeployPaths::from_deployment_root("/srv/deploy/plaza"));
        let patch = auth_env_patch(&config);
        let env = patch["spec"]["template"]["spec"]["containers"][0]["env"]
            .as_array()
            .unwrap()
            .clone();
        let value_of = |name: &str| {
            env.iter()
                .find(|e| e["name"] == name)
                .map(|e| e["value"].as_str().unwrap().to_string())
                .unwrap()
        };
        assert_eq!(value_of("STORE_CORS"), config.cors.store_cors());
        assert_eq!(value_of("ADMIN_CORS"), config.cors.admin_cors());
        assert_eq!(value_of("SESSION_SECRET"), config.secrets.session);
    }
}
