//! Populate the database with deterministic demo data.
//!
//! Without a subcommand this binary orchestrates: it loads the seed
//! registry, plans the task order, and runs each task in a fresh child
//! process, pausing between tasks so the database settles. The hidden
//! `run-task` subcommand is the child entry point that executes exactly one
//! task in-process.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use backend::domain::{SeedOrchestrator, SeedPlan, SeedTaskExecutor, SeedTaskName};
use backend::outbound::ProcessSeedTaskRunner;
use backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselComplaintRepository, PoolConfig,
    run_pending_migrations,
};
use backend::outbound::security::BcryptPasswordHasher;
use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use seed_data::SeedRegistry;
use tokio::runtime::Builder;

const DEFAULT_REGISTRY_PATH: &str = "backend/fixtures/seed-data/registry.json";
const DEFAULT_SEED_NAME: &str = "demo";

/// `seed` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed",
    about = "Seed the database with deterministic demo accounts and complaints",
    version
)]
struct CliArgs {
    /// Path to the seed registry JSON file.
    #[arg(long = "registry", value_name = "path", default_value = DEFAULT_REGISTRY_PATH)]
    registry: PathBuf,
    /// Named seed to draw deterministic data from.
    #[arg(long = "seed", value_name = "name", default_value = DEFAULT_SEED_NAME)]
    seed: String,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Pause between tasks, in milliseconds.
    #[arg(long = "settle-delay-ms", value_name = "ms")]
    settle_delay_ms: Option<u64>,
    #[command(subcommand)]
    command: Option<SeedCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum SeedCommand {
    /// Run exactly one seed task in this process. Used by the orchestrator.
    #[command(hide = true)]
    RunTask {
        /// Name of the task to run.
        name: String,
    },
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    match args.command.clone() {
        Some(SeedCommand::RunTask { name }) => run_single_task(args, &name).await,
        None => orchestrate(args).await,
    }
}

/// Parent mode: plan from the registry and run every task in a child process.
async fn orchestrate(args: CliArgs) -> io::Result<()> {
    let registry = load_registry(&args.registry)?;
    let plan = SeedPlan::from_names(registry.tasks())
        .map_err(|error| io::Error::other(format!("seed plan invalid: {error}")))?;

    let database_url = resolve_database_url(args.database_url.clone())?;
    let applied = run_pending_migrations(&database_url)
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    if applied > 0 {
        println!("applied_migrations={applied}");
    }

    let runner = ProcessSeedTaskRunner::from_current_exe(passthrough_flags(&args, &database_url))
        .map_err(|error| io::Error::other(format!("resolve seeding executable: {error}")))?;
    let mut orchestrator = SeedOrchestrator::new(Arc::new(runner));
    if let Some(ms) = args.settle_delay_ms {
        orchestrator = orchestrator.with_settle_delay(Duration::from_millis(ms));
    }

    let report = orchestrator.run_all(&plan).await;
    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(()) => println!("task={} status=ok", outcome.task.name),
            Err(error) => println!("task={} status=failed detail={error}", outcome.task.name),
        }
    }
    println!("succeeded={}/{}", report.succeeded(), report.total());

    if report.is_complete() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "{} of {} seed tasks failed",
            report.failed(),
            report.total()
        )))
    }
}

/// Child mode: execute one task against the database and exit.
async fn run_single_task(args: CliArgs, name: &str) -> io::Result<()> {
    let task = SeedTaskName::new(name)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error.to_string()))?;
    let registry = load_registry(&args.registry)?;

    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let executor = SeedTaskExecutor::new(
        Arc::new(DieselAccountRepository::new(pool.clone())),
        Arc::new(DieselComplaintRepository::new(pool)),
        Arc::new(BcryptPasswordHasher),
        Arc::new(DefaultClock),
        registry,
        args.seed,
    );
    let summary = executor
        .execute(&task)
        .await
        .map_err(|error| io::Error::other(format!("task '{name}' failed: {error}")))?;

    println!(
        "task={} written={} skipped={}",
        summary.task, summary.written, summary.skipped
    );
    Ok(())
}

/// Flags each child needs to resolve the same registry, seed, and database.
fn passthrough_flags(args: &CliArgs, database_url: &str) -> Vec<String> {
    vec![
        "--registry".to_owned(),
        args.registry.display().to_string(),
        "--seed".to_owned(),
        args.seed.clone(),
        "--database-url".to_owned(),
        database_url.to_owned(),
    ]
}

fn load_registry(path: &Path) -> io::Result<SeedRegistry> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let parent = parent.unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "registry path must be a file")
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open registry directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory.open(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("open registry '{}': {error}", path.display()))
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|error| {
        io::Error::other(format!("read registry '{}': {error}", path.display()))
    })?;
    SeedRegistry::from_json(&contents)
        .map_err(|error| io::Error::other(format!("registry invalid: {error}")))
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing and registry loading helpers.

    use std::io::Write;
    use std::path::PathBuf;

    use clap::Parser;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::{CliArgs, SeedCommand, load_registry, passthrough_flags, resolve_database_url};

    #[rstest]
    fn defaults_cover_registry_and_seed_name() {
        let args = CliArgs::try_parse_from(["seed"]).expect("defaults should parse");
        assert_eq!(
            args.registry,
            PathBuf::from("backend/fixtures/seed-data/registry.json")
        );
        assert_eq!(args.seed, "demo");
        assert!(args.command.is_none());
    }

    #[rstest]
    fn run_task_subcommand_carries_the_task_name() {
        let args =
            CliArgs::try_parse_from(["seed", "run-task", "accounts"]).expect("should parse");
        match args.command {
            Some(SeedCommand::RunTask { name }) => assert_eq!(name, "accounts"),
            other => panic!("expected run-task subcommand, got {other:?}"),
        }
    }

    #[rstest]
    fn passthrough_flags_pin_registry_seed_and_database() {
        let args = CliArgs::try_parse_from([
            "seed",
            "--registry",
            "custom/registry.json",
            "--seed",
            "smoke",
        ])
        .expect("should parse");
        let flags = passthrough_flags(&args, "postgres://db/curbside");
        assert_eq!(
            flags,
            [
                "--registry",
                "custom/registry.json",
                "--seed",
                "smoke",
                "--database-url",
                "postgres://db/curbside",
            ]
        );
    }

    #[rstest]
    fn registry_loads_from_disk() {
        let mut file = NamedTempFile::new().expect("create temp registry");
        file.write_all(
            br#"{
                "version": 1,
                "tasks": ["accounts", "complaints", "votes"],
                "streets": ["Mill Road"],
                "seeds": [{"name": "demo", "seed": 42, "accountCount": 4, "complaintCount": 6}]
            }"#,
        )
        .expect("write temp registry");
        let registry = load_registry(file.path()).expect("registry should load");
        assert_eq!(registry.tasks(), ["accounts", "complaints", "votes"]);
    }

    #[rstest]
    fn blank_explicit_database_url_is_rejected() {
        let error = resolve_database_url(Some(" ".into())).expect_err("blank should fail");
        assert!(error.to_string().contains("must not be empty"));
    }
}
