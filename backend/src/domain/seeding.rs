//! Seed run planning and orchestration.
//!
//! A [`SeedPlan`] is built from the registry's ordered task list; the
//! [`SeedOrchestrator`] walks it one task at a time through a
//! [`SeedTaskRunner`], letting failed tasks report without aborting the rest
//! of the run. Process exit codes are the binary's business; everything here
//! returns a [`SeedRunReport`] instead.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::domain::ports::{SeedTaskError, SeedTaskRunner};

/// Pause between consecutive tasks so one task's writes settle before the
/// next task reads them.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Errors raised while building a [`SeedPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedPlanError {
    /// The registry listed no tasks.
    #[error("seed plan must contain at least one task")]
    EmptyPlan,
    /// A task name failed validation.
    #[error("invalid seed task name: {value:?}")]
    InvalidTaskName {
        /// The offending raw value.
        value: String,
    },
}

/// Validated seed task name: lowercase alphanumerics, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedTaskName(String);

impl SeedTaskName {
    /// Validate and construct a [`SeedTaskName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, SeedPlanError> {
        let trimmed = name.as_ref().trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(SeedPlanError::InvalidTaskName {
                value: name.as_ref().to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeedTaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a seed plan, carrying its position in the declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTask {
    pub name: SeedTaskName,
    pub ordinal: usize,
}

/// Ordered, deduplicated list of seed tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    tasks: Vec<SeedTask>,
}

impl SeedPlan {
    /// Build a plan from raw task names, keeping first occurrences in order.
    pub fn from_names<I, S>(names: I) -> Result<Self, SeedPlanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();
        for raw in names {
            let name = SeedTaskName::new(raw.as_ref())?;
            if seen.insert(name.clone()) {
                let ordinal = tasks.len();
                tasks.push(SeedTask { name, ordinal });
            }
        }
        if tasks.is_empty() {
            return Err(SeedPlanError::EmptyPlan);
        }
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &[SeedTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Outcome of one task within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTaskOutcome {
    pub task: SeedTask,
    pub result: Result<(), SeedTaskError>,
}

/// Aggregated outcome of a whole seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRunReport {
    outcomes: Vec<SeedTaskOutcome>,
}

impl SeedRunReport {
    pub fn outcomes(&self) -> &[SeedTaskOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Whether every task in the run succeeded.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// Runs a [`SeedPlan`] task by task, in order, without short-circuiting.
pub struct SeedOrchestrator<R> {
    runner: Arc<R>,
    settle_delay: Duration,
}

impl<R> SeedOrchestrator<R> {
    /// Create an orchestrator with the default settling delay.
    pub fn new(runner: Arc<R>) -> Self {
        Self {
            runner,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Override the settling delay; tests pass [`Duration::ZERO`].
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }
}

impl<R> SeedOrchestrator<R>
where
    R: SeedTaskRunner,
{
    /// Run every task in the plan, in order.
    ///
    /// A failing task is logged and recorded, and the run moves on; the
    /// caller inspects the report to decide how the process should exit.
    pub async fn run_all(&self, plan: &SeedPlan) -> SeedRunReport {
        let mut outcomes = Vec::with_capacity(plan.len());
        for task in plan.tasks() {
            info!(task = %task.name, ordinal = task.ordinal, "running seed task");
            let result = self.runner.run(task).await;
            match &result {
                Ok(()) => info!(task = %task.name, "seed task completed"),
                Err(failure) => {
                    error!(task = %task.name, error = %failure, "seed task failed; continuing");
                }
            }
            outcomes.push(SeedTaskOutcome {
                task: task.clone(),
                result,
            });
            if task.ordinal + 1 < plan.len() {
                tokio::time::sleep(self.settle_delay).await;
            }
        }
        SeedRunReport { outcomes }
    }
}
