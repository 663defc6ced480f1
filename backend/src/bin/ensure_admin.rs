//! Guarantee the well-known superadmin account exists.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::sync::Arc;

use backend::domain::AdminBootstrapper;
use backend::outbound::persistence::{
    DbPool, DieselAccountRepository, PoolConfig, run_pending_migrations,
};
use backend::outbound::security::BcryptPasswordHasher;
use clap::Parser;
use mockable::DefaultClock;
use tokio::runtime::Builder;

/// `ensure-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ensure-admin",
    about = "Create the default superadmin account if it is missing",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Skip applying pending schema migrations before bootstrapping.
    #[arg(long = "skip-migrations")]
    skip_migrations: bool,
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
    let database_url = resolve_database_url(args.database_url)?;

    if !args.skip_migrations {
        let applied = run_pending_migrations(&database_url)
            .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
        if applied > 0 {
            println!("applied_migrations={applied}");
        }
    }

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let bootstrapper = AdminBootstrapper::new(
        Arc::new(DieselAccountRepository::new(pool)),
        Arc::new(BcryptPasswordHasher),
        Arc::new(DefaultClock),
    );
    let outcome = bootstrapper
        .ensure_default_admin()
        .await
        .map_err(|error| io::Error::other(format!("bootstrap failed: {error}")))?;

    println!("email={}", outcome.email);
    println!("created={}", outcome.created);

    Ok(())
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
    //! Unit tests for CLI argument resolution.

    use rstest::rstest;

    use super::resolve_database_url;

    #[rstest]
    fn explicit_database_url_wins() {
        let url = resolve_database_url(Some("postgres://db/one".into()))
            .expect("explicit url should resolve");
        assert_eq!(url, "postgres://db/one");
    }

    #[rstest]
    fn blank_explicit_database_url_is_rejected() {
        let error = resolve_database_url(Some("   ".into())).expect_err("blank should fail");
        assert!(error.to_string().contains("must not be empty"));
    }
}
