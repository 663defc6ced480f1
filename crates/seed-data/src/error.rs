//! Error types for the seed-data crate.
//!
//! This module defines semantic error enums for registry parsing and demo
//! data generation, following the project's error handling conventions with
//! `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or querying a seed registry.
///
/// These errors cover file I/O, JSON parsing, schema validation, and seed
/// lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry declares no seeding tasks.
    #[error("registry declares no seeding tasks")]
    EmptyTasks,

    /// The registry declares the same seeding task more than once.
    #[error("registry declares seeding task '{name}' more than once")]
    DuplicateTask {
        /// The duplicated task name.
        name: String,
    },

    /// A street entry is blank or too long to build complaint titles from.
    #[error("invalid street at index {index}: '{value}'")]
    InvalidStreet {
        /// Index of the invalid street in the array.
        index: usize,
        /// The invalid street value.
        value: String,
    },

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur during demo data generation.
///
/// These errors indicate failures in the generation process itself, such as
/// inability to produce valid display names or missing registry data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Failed to generate a valid display name after maximum retries.
    #[error("failed to generate valid display name after {max_attempts} attempts")]
    DisplayNameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },

    /// The registry contains no streets to place complaints on.
    #[error("registry contains no streets to place complaints on")]
    NoStreets,

    /// The seed definition generates no accounts to attribute complaints to.
    #[error("seed definition generates no accounts to attribute complaints to")]
    NoSubmitters,
}
