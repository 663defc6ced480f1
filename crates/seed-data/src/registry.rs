//! Seed registry types and JSON parsing.
//!
//! This module defines the seed registry structure that holds the ordered
//! seeding task list, the street pool, and named seed definitions. The
//! registry is loaded from JSON and provides deterministic seed lookups.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// Maximum character length for a street entry.
///
/// Keeps generated complaint titles within backend title constraints.
const STREET_MAX: usize = 80;

/// A seed registry containing the seeding task list, streets, and named seeds.
///
/// The registry is loaded from a JSON file and provides the ordered task list
/// the seeding binary executes, the street pool complaints are placed on, and
/// the seed definitions that drive deterministic generation.
///
/// # Example
///
/// ```
/// use seed_data::SeedRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "tasks": ["accounts", "complaints"],
///     "streets": ["Mill Lane"],
///     "seeds": [{"name": "test", "seed": 42, "accountCount": 5, "complaintCount": 8}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.tasks(), ["accounts", "complaints"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    version: u32,
    tasks: Vec<String>,
    streets: Vec<String>,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed
    /// - Required fields are missing
    /// - The version is unsupported
    /// - The task list is empty or contains duplicates
    /// - Any street entry is blank or longer than 80 characters
    /// - The seeds array is empty
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a seed registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        // Validate version
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        // The task list is the execution order; it must name each task once
        if raw.tasks.is_empty() {
            return Err(RegistryError::EmptyTasks);
        }
        let mut seen = HashSet::new();
        for task in &raw.tasks {
            if !seen.insert(task.as_str()) {
                return Err(RegistryError::DuplicateTask { name: task.clone() });
            }
        }

        // Validate street entries; the pool itself may be empty for
        // registries that only seed accounts
        for (index, street) in raw.streets.iter().enumerate() {
            if street.trim().is_empty() || street.chars().count() > STREET_MAX {
                return Err(RegistryError::InvalidStreet {
                    index,
                    value: street.clone(),
                });
            }
        }

        // Validate seeds
        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let seeds = raw
            .seeds
            .into_iter()
            .map(|s| SeedDefinition {
                name: s.name,
                seed: s.seed,
                account_count: s.account_count,
                complaint_count: s.complaint_count,
            })
            .collect();

        Ok(Self {
            version: raw.version,
            tasks: raw.tasks,
            streets: raw.streets,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the seeding task names in execution order.
    #[must_use]
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Returns the street pool complaints are placed on.
    #[must_use]
    pub fn streets(&self) -> &[String] {
        &self.streets
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// A named seed definition for deterministic demo data generation.
///
/// Each seed has a unique name, an RNG seed value, and the number of accounts
/// and complaints to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    account_count: usize,
    complaint_count: usize,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of accounts to generate.
    #[must_use]
    pub const fn account_count(&self) -> usize {
        self.account_count
    }

    /// Returns the number of complaints to generate.
    #[must_use]
    pub const fn complaint_count(&self) -> usize {
        self.complaint_count
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    tasks: Vec<String>,
    #[serde(default)]
    streets: Vec<String>,
    seeds: Vec<RawSeedDefinition>,
}

/// Raw JSON representation of a seed definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    account_count: usize,
    complaint_count: usize,
}
