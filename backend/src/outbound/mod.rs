//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations; they contain no business logic.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: bcrypt password hashing and JWT issue/verify
//! - **process_seed_task_runner**: subprocess isolation for seed tasks

pub mod persistence;
pub mod process_seed_task_runner;
pub mod security;

pub use process_seed_task_runner::ProcessSeedTaskRunner;
