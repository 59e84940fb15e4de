//! Integration tests for the install command.

mod support;

use std::sync::Arc;

use tempfile::TempDir;

use plaza_core::commands::{InstallCommand, InstallOptions};

use support::{RecordingRunner, test_config};

fn setup() -> (TempDir, Arc<RecordingRunner>) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let runner = Arc::new(RecordingRunner::new());
    (temp, runner)
}

#[test]
fn install_clones_then_installs_each_component() {
    let (temp, runner) = setup();
    let config = test_config(&temp.path().join("plaza"));
    let cmd = InstallCommand::new(&config, runner.clone());

    let report = cmd
        .execute(&InstallOptions::new("demo"))
        .expect("Install should succeed");

    assert_eq!(report.components, vec!["backend", "storefront", "vendor-panel"]);
    assert!(report.project_dir.ends_with("demo"));

    let lines = runner.run_lines();
    assert_eq!(lines.len(), 6, "three clones and three npm installs");
    assert!(lines[0].starts_with("git clone") && lines[0].ends_with("backend"));
    assert_eq!(lines[1], "npm install");
    assert!(lines[2].ends_with("storefront"));
    assert!(lines[4].ends_with("vendor-panel"));
}

#[test]
fn npm_install_runs_inside_cloned_directory() {
    let (temp, runner) = setup();
    let config = test_config(&temp.path().join("plaza"));
    let cmd = InstallCommand::new(&config, runner.clone());

    cmd.execute(&InstallOptions::new("demo").with_storefront(false).with_vendor_panel(false))
        .expect("Install should succeed");

    let runs = runner.runs();
    assert_eq!(runs.len(), 2);
    let npm = &runs[1];
    assert_eq!(npm.program, "npm");
    assert!(
        npm.cwd.as_ref().unwrap().ends_with("demo/backend"),
        "npm install should run in the backend checkout"
    );
}

#[test]
fn skipping_storefront_issues_no_storefront_commands() {
    let (temp, runner) = setup();
    let config = test_config(&temp.path().join("plaza"));
    let cmd = InstallCommand::new(&config, runner.clone());

    cmd.execute(&InstallOptions::new("demo").with_storefront(false))
        .expect("Install should succeed");

    for line in runner.run_lines() {
        assert!(
            !line.contains("storefront"),
            "no storefront command expected: {line}"
        );
    }
}

#[test]
fn clone_failure_aborts_install() {
    let (temp, runner) = setup();
    let config = test_config(&temp.path().join("plaza"));
    runner.fail_when("git", "clone");
    let cmd = InstallCommand::new(&config, runner.clone());

    let err = cmd.execute(&InstallOptions::new("demo")).unwrap_err();
    assert!(err.to_string().contains("Failed to clone backend"));

    // Nothing after the failing clone ran.
    assert_eq!(runner.runs().len(), 1);
}

#[test]
fn npm_failure_aborts_before_next_component() {
    let (temp, runner) = setup();
    let config = test_config(&temp.path().join("plaza"));
    runner.fail_when("npm", "install");
    let cmd = InstallCommand::new(&config, runner.clone());

    let err = cmd.execute(&InstallOptions::new("demo")).unwrap_err();
    assert!(err.to_string().contains("Failed to install dependencies for backend"));
    assert_eq!(runner.runs().len(), 2, "stops after the failing npm install");
}

#[test]
fn install_creates_project_directory() {
    let (temp, runner) = setup();
    let config = test_config(&temp.path().join("plaza"));
    let cmd = InstallCommand::new(&config, runner);

    let report = cmd
        .execute(&InstallOptions::new("demo").with_storefront(false).with_vendor_panel(false))
        .expect("Install should succeed");

    assert!(report.project_dir.is_dir(), "project directory should exist");
}
