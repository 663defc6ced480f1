//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary so the server and the operational
//! binaries can bring a database up to date without a separate Diesel CLI
//! install. Application happens over a synchronous connection because
//! `diesel_migrations` does not speak `diesel-async`; it runs once at
//! startup, before the pool is built.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure while connecting for or applying migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("database connection for migrations failed: {message}")]
    Connect { message: String },
    #[error("applying migrations failed: {message}")]
    Apply { message: String },
}

/// Apply all pending migrations, returning how many ran.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut connection = PgConnection::establish(database_url).map_err(|error| {
        MigrationError::Connect {
            message: error.to_string(),
        }
    })?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|error| MigrationError::Apply {
            message: error.to_string(),
        })?;
    Ok(applied.len())
}
