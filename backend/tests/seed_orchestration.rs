//! Integration coverage for subprocess-isolated seed runs.
//!
//! The orchestrator's report-and-continue behaviour is covered by unit tests
//! beside the domain code; these tests drive [`ProcessSeedTaskRunner`]
//! against real child processes to check spawning, output relaying, and exit
//! status handling.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;
use std::time::Duration;

use backend::domain::ports::SeedTaskRunner;
use backend::domain::{SeedOrchestrator, SeedPlan, SeedTask, SeedTaskName};
use backend::outbound::ProcessSeedTaskRunner;
use tempfile::TempDir;

/// Write an executable shell stub that fails for the named tasks.
fn script_stub(failing_tasks: &[&str]) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create stub directory");
    let path = dir.path().join("seed-stub.sh");
    let mut script = String::from("#!/bin/sh\n# args: run-task <name> [flags..]\ncase \"$2\" in\n");
    for task in failing_tasks {
        script.push_str(&format!("{task}) echo \"{task} exploded\" >&2; exit 1 ;;\n"));
    }
    script.push_str("*) echo \"seeded $2\"; exit 0 ;;\nesac\n");
    let mut file = fs::File::create(&path).expect("create stub script");
    file.write_all(script.as_bytes()).expect("write stub script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("mark executable");
    (dir, path)
}

fn plan() -> SeedPlan {
    SeedPlan::from_names(["accounts", "complaints", "votes"]).expect("valid plan")
}

#[tokio::test]
async fn successful_children_complete_the_run() {
    let (_dir, stub) = script_stub(&[]);
    let runner = ProcessSeedTaskRunner::new(stub, Vec::new());
    let orchestrator =
        SeedOrchestrator::new(Arc::new(runner)).with_settle_delay(Duration::ZERO);

    let report = orchestrator.run_all(&plan()).await;

    assert!(report.is_complete());
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.total(), 3);
}

#[tokio::test]
async fn a_failing_child_does_not_stop_its_siblings() {
    let (_dir, stub) = script_stub(&["complaints"]);
    let runner = ProcessSeedTaskRunner::new(stub, Vec::new());
    let orchestrator =
        SeedOrchestrator::new(Arc::new(runner)).with_settle_delay(Duration::ZERO);

    let report = orchestrator.run_all(&plan()).await;

    assert!(!report.is_complete());
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.total(), 3);

    let statuses: Vec<(String, bool)> = report
        .outcomes()
        .iter()
        .map(|outcome| (outcome.task.name.to_string(), outcome.result.is_ok()))
        .collect();
    assert_eq!(
        statuses,
        [
            ("accounts".to_owned(), true),
            ("complaints".to_owned(), false),
            ("votes".to_owned(), true),
        ]
    );
}

#[tokio::test]
async fn a_missing_program_reports_a_spawn_failure() {
    let runner = ProcessSeedTaskRunner::new("/nonexistent/seed-binary", Vec::new());
    let task = SeedTask {
        name: SeedTaskName::new("accounts").expect("valid name"),
        ordinal: 0,
    };

    let error = runner.run(&task).await.expect_err("spawn should fail");
    assert!(error.to_string().contains("failed to spawn"));
}

#[tokio::test]
async fn passthrough_flags_reach_the_child() {
    let dir = TempDir::new().expect("create stub directory");
    let marker = dir.path().join("observed-args");
    let path = dir.path().join("seed-stub.sh");
    let script = format!("#!/bin/sh\necho \"$@\" > {}\nexit 0\n", marker.display());
    fs::write(&path, script).expect("write stub script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("mark executable");

    let runner = ProcessSeedTaskRunner::new(
        path,
        vec!["--seed".to_owned(), "smoke".to_owned()],
    );
    let task = SeedTask {
        name: SeedTaskName::new("accounts").expect("valid name"),
        ordinal: 0,
    };
    runner.run(&task).await.expect("stub run succeeds");

    let observed = fs::read_to_string(&marker).expect("stub wrote its args");
    assert_eq!(observed.trim(), "run-task accounts --seed smoke");
}
