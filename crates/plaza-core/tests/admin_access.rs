//! Integration tests for the admin access command.

mod support;

use std::path::Path;
use std::sync::Arc;

use plaza_core::commands::{AdminAccessCommand, AdminAccessOptions};

use support::{RecordingRunner, test_config};

fn options() -> AdminAccessOptions {
    AdminAccessOptions::default().without_waits()
}

#[test]
fn kills_stale_forward_then_spawns_new_one() {
    let runner = Arc::new(RecordingRunner::new());
    let config = test_config(Path::new("/srv/deploy/plaza"));
    let cmd = AdminAccessCommand::new(&config, runner.clone());

    cmd.execute(&options()).expect("Admin access should succeed");

    let runs = runner.runs();
    assert_eq!(runs[0].program, "pkill");
    assert!(runs[0].args[1].contains("port-forward"));
    assert!(runs[0].args[1].contains(&config.kubernetes.backend_deployment));

    let spawns = runner.spawns();
    assert_eq!(spawns.len(), 1);
    assert_eq!(
        spawns[0].display(),
        format!(
            "kubectl port-forward -n {} deployment/{} 8080:{}",
            config.kubernetes.namespace,
            config.kubernetes.backend_deployment,
            config.kubernetes.backend_service.port
        )
    );
}

#[test]
fn reachable_on_first_probe() {
    let runner = Arc::new(RecordingRunner::new());
    let config = test_config(Path::new("/srv/deploy/plaza"));
    let cmd = AdminAccessCommand::new(&config, runner.clone());

    let report = cmd.execute(&options()).expect("Admin access should succeed");

    assert!(report.reachable);
    assert!(report.warnings.is_empty());
    assert_eq!(report.url, "http://localhost:8080/app");

    let curls: Vec<_> = runner
        .runs()
        .into_iter()
        .filter(|s| s.program == "curl")
        .collect();
    assert_eq!(curls.len(), 1, "no retry when the first probe succeeds");
}

#[test]
fn unreachable_panel_is_a_warning_not_an_error() {
    let runner = Arc::new(RecordingRunner::new());
    let config = test_config(Path::new("/srv/deploy/plaza"));
    runner.fail_when("curl", "http://localhost:8080/app");
    let cmd = AdminAccessCommand::new(&config, runner.clone());

    let report = cmd.execute(&options()).expect("Command still succeeds");

    assert!(!report.reachable);
    assert_eq!(report.warnings.len(), 1);

    let curls = runner
        .runs()
        .into_iter()
        .filter(|s| s.program == "curl")
        .count();
    assert_eq!(curls, 2, "probe is retried exactly once");
}

#[test]
fn custom_local_port_is_used_in_forward_and_probe() {
    let runner = Arc::new(RecordingRunner::new());
    let config = test_config(Path::new("/srv/deploy/plaza"));
    let cmd = AdminAccessCommand::new(&config, runner.clone());

    let report = cmd
        .execute(&options().with_local_port(9999))
        .expect("Admin access should succeed");

    assert_eq!(report.url, "http://localhost:9999/app");
    assert!(runner.spawns()[0].display().contains("9999:"));
}
