//! Subprocess-per-task `SeedTaskRunner` implementation.
//!
//! Re-invokes the seeding executable with `run-task <name>` so every task
//! runs in a fresh process; a crashing task cannot poison its siblings.
//! Child stdout and stderr are relayed line by line into the parent's logs
//! as they arrive, and both streams are drained to EOF before the exit
//! status is read.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::ports::{SeedTaskError, SeedTaskRunner};
use crate::domain::seeding::SeedTask;

/// Runs each seed task as `<program> run-task <name> [passthrough..]`.
#[derive(Debug, Clone)]
pub struct ProcessSeedTaskRunner {
    program: PathBuf,
    passthrough: Vec<String>,
}

impl ProcessSeedTaskRunner {
    /// Create a runner invoking the given program.
    ///
    /// `passthrough` flags are appended to every child invocation so the
    /// child resolves the same registry and seed as the parent.
    pub fn new(program: impl Into<PathBuf>, passthrough: Vec<String>) -> Self {
        Self {
            program: program.into(),
            passthrough,
        }
    }

    /// Create a runner that re-invokes the current executable.
    pub fn from_current_exe(passthrough: Vec<String>) -> Result<Self, SeedTaskError> {
        let program =
            std::env::current_exe().map_err(|error| SeedTaskError::spawn(error.to_string()))?;
        Ok(Self::new(program, passthrough))
    }
}

async fn relay_lines<R, F>(stream: R, mut log: F) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut lines = BufReader::new(stream).lines();
    while let Some(line) = lines.next_line().await? {
        log(&line);
    }
    Ok(())
}

#[async_trait]
impl SeedTaskRunner for ProcessSeedTaskRunner {
    async fn run(&self, task: &SeedTask) -> Result<(), SeedTaskError> {
        let mut child = Command::new(&self.program)
            .arg("run-task")
            .arg(task.name.as_str())
            .args(&self.passthrough)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| SeedTaskError::spawn(error.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SeedTaskError::relay("child stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| SeedTaskError::relay("child stderr was not captured"))?;

        let (stdout_result, stderr_result) = tokio::join!(
            relay_lines(stdout, |line| info!(task = %task.name, "{line}")),
            relay_lines(stderr, |line| warn!(task = %task.name, "{line}")),
        );

        // A broken pipe can leave the child blocked on a write; make sure it
        // is gone before reaping.
        if stdout_result.is_err() || stderr_result.is_err() {
            let _ = child.start_kill();
        }

        let status = child
            .wait()
            .await
            .map_err(|error| SeedTaskError::relay(error.to_string()))?;

        stdout_result.map_err(|error| SeedTaskError::relay(error.to_string()))?;
        stderr_result.map_err(|error| SeedTaskError::relay(error.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(SeedTaskError::failed(match status.code() {
                Some(code) => format!("task process exited with status {code}"),
                None => "task process was terminated by a signal".to_owned(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seeding::SeedTaskName;

    fn task(name: &str) -> SeedTask {
        SeedTask {
            name: SeedTaskName::new(name).expect("valid name"),
            ordinal: 0,
        }
    }

    #[cfg(unix)]
    fn scripted_runner(dir: &tempfile::TempDir, script: &str) -> ProcessSeedTaskRunner {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("seed-stub.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("mark executable");
        ProcessSeedTaskRunner::new(path, Vec::new())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_tasks_succeed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = scripted_runner(&dir, r#"echo "seeded $2"; exit 0"#);

        runner.run(&task("accounts")).await.expect("task succeeds");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exits_carry_the_status_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = scripted_runner(&dir, r#"echo "boom $2" >&2; exit 3"#);

        let error = runner
            .run(&task("complaints"))
            .await
            .expect_err("must fail");

        assert!(matches!(
            &error,
            SeedTaskError::Failed { detail } if detail.contains("status 3")
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn children_receive_the_task_name_and_passthrough_flags() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("args.txt");
        let path = dir.path().join("seed-stub.sh");
        std::fs::write(&path, format!("#!/bin/sh\necho \"$@\" > {}\n", marker.display()))
            .expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("mark executable");
        let runner = ProcessSeedTaskRunner::new(
            path,
            vec!["--seed".to_owned(), "demo".to_owned()],
        );

        runner.run(&task("votes")).await.expect("task succeeds");

        let recorded = std::fs::read_to_string(&marker).expect("marker written");
        assert_eq!(recorded.trim(), "run-task votes --seed demo");
    }

    #[tokio::test]
    async fn missing_programs_surface_as_spawn_errors() {
        let runner = ProcessSeedTaskRunner::new("/nonexistent/seed-binary", Vec::new());

        let error = runner.run(&task("accounts")).await.expect_err("must fail");

        assert!(matches!(error, SeedTaskError::Spawn { .. }));
    }
}
