//! Shared test support: a recording command runner and config helpers.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use plaza_core::config::{DeployConfig, DeployPaths};
use plaza_core::process::{CommandOutput, CommandRunner, CommandSpec, ProcessError};

#[derive(Debug, Clone)]
struct FailureRule {
    program: String,
    arg_contains: String,
}

/// Records every invocation and succeeds unless a scripted failure matches.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    runs: Mutex<Vec<CommandSpec>>,
    spawns: Mutex<Vec<CommandSpec>>,
    failures: Mutex<Vec<FailureRule>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any run of `program` whose rendered arguments contain `arg_contains`.
    pub fn fail_when(&self, program: &str, arg_contains: &str) {
        self.failures.lock().unwrap().push(FailureRule {
            program: program.to_string(),
            arg_contains: arg_contains.to_string(),
        });
    }

    pub fn runs(&self) -> Vec<CommandSpec> {
        self.runs.lock().unwrap().clone()
    }

    pub fn spawns(&self) -> Vec<CommandSpec> {
        self.spawns.lock().unwrap().clone()
    }

    /// Rendered command lines of all blocking runs, in order.
    pub fn run_lines(&self) -> Vec<String> {
        self.runs().iter().map(CommandSpec::display).collect()
    }

    fn should_fail(&self, spec: &CommandSpec) -> bool {
        let rendered = spec.args.join(" ");
        self.failures
            .lock()
            .unwrap()
            .iter()
            .any(|rule| rule.program == spec.program && rendered.contains(&rule.arg_contains))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        self.runs.lock().unwrap().push(spec.clone());
        if self.should_fail(spec) {
            return Err(ProcessError::Failed {
                command: spec.display(),
                detail: "scripted failure".to_string(),
            });
        }
        Ok(CommandOutput::default())
    }

    fn spawn_detached(&self, spec: &CommandSpec) -> Result<(), ProcessError> {
        self.spawns.lock().unwrap().push(spec.clone());
        Ok(())
    }
}

/// Default configuration rooted at `root`.
pub fn test_config(root: &Path) -> DeployConfig {
    DeployConfig::with_defaults(DeployPaths::from_deployment_root(root))
}
