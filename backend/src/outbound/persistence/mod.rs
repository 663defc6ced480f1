//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! The adapters stay thin: they translate between Diesel row structs and
//! domain types and map database failures onto port error types. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) are internal to this
//! module and never cross into the domain.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/curbside")).await?;
//! let accounts = DieselAccountRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_complaint_repository;
mod diesel_error_mapping;
pub mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_complaint_repository::DieselComplaintRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
