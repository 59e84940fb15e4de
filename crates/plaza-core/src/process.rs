//! External process execution seam.
//!
//! Every external tool (`git`, `npm`, `npx`, `kubectl`, `curl`, `pkill`)
//! is invoked through the [`CommandRunner`] trait so tests can record and
//! script invocations instead of touching the system.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command failed: {command}: {detail}")]
    Failed { command: String, detail: String },
}

/// A fully described external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Stream output to the user's terminal instead of capturing it.
    pub inherit_stdio: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            inherit_stdio: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn inherit_stdio(mut self) -> Self {
        self.inherit_stdio = true;
        self
    }

    /// Human-readable rendering for logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Seam for external process execution.
pub trait CommandRunner: Send + Sync {
    /// Run to completion; a non-zero exit status is an error.
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError>;

    /// Start a long-lived process (e.g. a port-forward) without waiting.
    fn spawn_detached(&self, spec: &CommandSpec) -> Result<(), ProcessError>;
}

/// Runs commands on the real system via `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let mut cmd = Self::command(spec);

        if spec.inherit_stdio {
            let status = cmd.status().map_err(|source| ProcessError::Spawn {
                program: spec.program.clone(),
                source,
            })?;
            if !status.success() {
                return Err(ProcessError::Failed {
                    command: spec.display(),
                    detail: format!("exit status {status}"),
                });
            }
            return Ok(CommandOutput::default());
        }

        let output = cmd.output().map_err(|source| ProcessError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessError::Failed {
                command: spec.display(),
                detail: stderr.trim().to_string(),
            });
        }
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn spawn_detached(&self, spec: &CommandSpec) -> Result<(), ProcessError> {
        let mut cmd = Self::command(spec);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        // Dropping the Child leaves the process running, which is what a
        // port-forward needs.
        cmd.spawn().map_err(|source| ProcessError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_display_joins_program_and_args() {
        let spec = CommandSpec::new("git").args(["clone", "https://example.com/r.git", "backend"]);
        assert_eq!(spec.display(), "git clone https://example.com/r.git backend");
    }

    #[test]
    fn spec_builder_sets_cwd_and_stdio() {
        let spec = CommandSpec::new("npm")
            .arg("install")
            .current_dir("/tmp/project")
            .inherit_stdio();
        assert_eq!(spec.cwd.as_deref(), Some(std::path::Path::new("/tmp/project")));
        assert!(spec.inherit_stdio);
    }

    #[test]
    fn system_runner_reports_missing_program_as_spawn_error() {
        let runner = SystemRunner;
        let err = runner
            .run(&CommandSpec::new("plaza-no-such-binary-for-test"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[test]
    fn system_runner_captures_stdout() {
        let runner = SystemRunner;
        let output = runner
            .run(&CommandSpec::new("echo").arg("hello"))
            .expect("echo should succeed");
        assert_eq!(output.stdout.trim(), "hello");
    }
}
