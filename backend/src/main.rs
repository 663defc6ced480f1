//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

mod server;

use server::{AppSettings, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::from_env()?;
    settings.diagnostics.install();

    let applied = run_pending_migrations(&settings.database_url)
        .map_err(|error| std::io::Error::other(format!("apply migrations: {error}")))?;
    if applied > 0 {
        info!(applied, "applied pending migrations");
    }

    let pool = DbPool::new(PoolConfig::new(&settings.database_url))
        .await
        .map_err(|error| std::io::Error::other(format!("create database pool: {error}")))?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(&settings, pool);
    info!(bind_addr = %config.bind_addr(), "starting HTTP server");
    server::create_server(health_state, config)?.await
}
