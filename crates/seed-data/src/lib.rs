//! Deterministic demo account and complaint generation for seeding purposes.
//!
//! This crate provides tools for generating believable, reproducible civic
//! complaint data from a JSON seed registry. It is designed to be independent
//! of backend domain types to avoid circular dependencies.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading seed registries from JSON files
//! - An ordered seeding task list declared by the registry
//! - Deterministic account and complaint generation using named seeds
//! - Display name validation matching backend constraints
//!
//! Accounts and complaints draw from independent RNG streams derived from the
//! same seed value, so a seeding task can regenerate one record kind without
//! replaying the other.
//!
//! # Example
//!
//! ```
//! use seed_data::{SeedRegistry, generate_demo_accounts};
//!
//! let json = r#"{
//!     "version": 1,
//!     "tasks": ["accounts", "complaints", "votes"],
//!     "streets": ["Mill Lane"],
//!     "seeds": [{"name": "test-seed", "seed": 42, "accountCount": 3, "complaintCount": 5}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("test-seed").expect("seed exists");
//! let accounts = generate_demo_accounts(seed_def).expect("generation succeeds");
//!
//! assert_eq!(accounts.len(), 3);
//! ```

mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use error::{GenerationError, RegistryError};
pub use generator::{generate_demo_accounts, generate_demo_complaints};
pub use registry::{SeedDefinition, SeedRegistry};
pub use seed::{AccountSeed, ComplaintSeed};
pub use validation::{DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, is_valid_display_name};
