//! Port for executing one seed task in isolation.

use async_trait::async_trait;

use crate::domain::seeding::SeedTask;

use super::define_port_error;

define_port_error! {
    /// Errors raised by seed task runner adapters.
    pub enum SeedTaskError {
        /// The task process could not be started.
        Spawn { message: String } =>
            "failed to spawn task process: {message}",
        /// Relaying the task's output failed mid-run.
        Relay { message: String } =>
            "failed to relay task output: {message}",
        /// The task ran and reported failure.
        Failed { detail: String } => "{detail}",
    }
}

/// Port for running a single seed task to completion.
///
/// The production adapter re-invokes the current executable so each task gets
/// a fresh process; a task crashing or leaking state cannot poison its
/// siblings. Runners report failure through `Err` and leave retry and exit
/// policy to the orchestrator and binary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedTaskRunner: Send + Sync {
    /// Run the task and wait for it to finish.
    async fn run(&self, task: &SeedTask) -> Result<(), SeedTaskError>;
}

/// Fixture runner for tests that only exercise planning.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSeedTaskRunner;

#[async_trait]
impl SeedTaskRunner for FixtureSeedTaskRunner {
    async fn run(&self, _task: &SeedTask) -> Result<(), SeedTaskError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seeding::SeedTaskName;

    #[tokio::test]
    async fn fixture_runner_always_succeeds() {
        let runner = FixtureSeedTaskRunner;
        let task = SeedTask {
            name: SeedTaskName::new("accounts").expect("valid name"),
            ordinal: 0,
        };
        runner.run(&task).await.expect("fixture run succeeds");
    }

    #[test]
    fn failure_detail_is_the_whole_message() {
        let error = SeedTaskError::failed("task process exited with status 1");
        assert_eq!(error.to_string(), "task process exited with status 1");
    }
}
