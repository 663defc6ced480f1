//! Seed task bodies.
//!
//! Each task named by the seed registry maps to one routine here. The
//! routines regenerate the deterministic demo data for the selected seed
//! definition and write it through the repository ports, skipping rows that
//! already exist so a re-run converges instead of duplicating.

use std::sync::Arc;

use mockable::Clock;
use seed_data::{
    GenerationError, RegistryError, SeedDefinition, SeedRegistry, generate_demo_accounts,
    generate_demo_complaints,
};
use thiserror::Error;
use tracing::info;

use crate::domain::account::{
    AccountId, AccountValidationError, ContactPhone, DisplayName, EmailAddress, NewAccount,
    PermissionFlags, Role,
};
use crate::domain::complaint::{
    ComplaintDescription, ComplaintId, ComplaintTitle, ComplaintValidationError, Location,
    NewComplaint,
};
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, ComplaintRepository, ComplaintRepositoryError,
    PasswordHasher, PasswordHasherError,
};
use crate::domain::seeding::SeedTaskName;

/// Shared password for every generated demo account.
pub const SEED_ACCOUNT_PASSWORD: &str = "Resident@123";

/// Errors raised while executing a single seed task.
#[derive(Debug, Error)]
pub enum SeedTaskExecutionError {
    /// No routine is registered under the requested task name.
    #[error("no seeding routine registered for task '{name}'")]
    UnknownTask {
        /// The unrecognised task name.
        name: String,
    },
    /// The registry has no seed definition under the configured name.
    #[error("seed registry lookup failed: {0}")]
    Registry(#[from] RegistryError),
    /// The deterministic generator could not produce demo data.
    #[error("demo data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated complaint points at an account index the generator
    /// never produced.
    #[error("complaint references submitter index {index} outside the generated accounts")]
    UnknownSubmitter {
        /// The out-of-range submitter index.
        index: usize,
    },
    /// A generated account failed domain validation.
    #[error("generated account failed validation: {0}")]
    Identity(AccountValidationError),
    /// A generated complaint failed domain validation.
    #[error("generated complaint failed validation: {0}")]
    Complaint(ComplaintValidationError),
    /// The account store rejected a read or write.
    #[error("account store failure: {0}")]
    Accounts(#[from] AccountRepositoryError),
    /// The complaint store rejected a read or write.
    #[error("complaint store failure: {0}")]
    Complaints(#[from] ComplaintRepositoryError),
    /// Hashing the shared demo password failed.
    #[error("password hashing failure: {0}")]
    Hashing(#[from] PasswordHasherError),
}

/// Outcome of one task run: rows written versus rows already in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTaskSummary {
    pub task: SeedTaskName,
    pub written: usize,
    pub skipped: usize,
}

/// Executes the seeding routine behind a task name.
///
/// The executor carries the registry and the selected seed definition name,
/// so every task regenerates the same deterministic streams. Row identifiers
/// come from the generator, which keeps the tasks idempotent: a row written
/// by an earlier run is found again by id (or email) and skipped.
pub struct SeedTaskExecutor<A, C, H> {
    accounts: Arc<A>,
    complaints: Arc<C>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    registry: SeedRegistry,
    seed_name: String,
}

impl<A, C, H> SeedTaskExecutor<A, C, H>
where
    A: AccountRepository,
    C: ComplaintRepository,
    H: PasswordHasher,
{
    pub fn new(
        accounts: Arc<A>,
        complaints: Arc<C>,
        hasher: Arc<H>,
        clock: Arc<dyn Clock>,
        registry: SeedRegistry,
        seed_name: impl Into<String>,
    ) -> Self {
        Self {
            accounts,
            complaints,
            hasher,
            clock,
            registry,
            seed_name: seed_name.into(),
        }
    }

    /// Run the routine registered for `task`.
    pub async fn execute(
        &self,
        task: &SeedTaskName,
    ) -> Result<SeedTaskSummary, SeedTaskExecutionError> {
        let seed = self.registry.find_seed(&self.seed_name)?;
        let summary = match task.as_str() {
            "accounts" => self.seed_accounts(task, seed).await?,
            "complaints" => self.seed_complaints(task, seed).await?,
            "votes" => self.seed_votes(task, seed).await?,
            other => {
                return Err(SeedTaskExecutionError::UnknownTask {
                    name: other.to_owned(),
                });
            }
        };
        info!(
            task = %summary.task,
            written = summary.written,
            skipped = summary.skipped,
            "seed task completed"
        );
        Ok(summary)
    }

    /// Write the demo accounts, all sharing one hash of
    /// [`SEED_ACCOUNT_PASSWORD`].
    async fn seed_accounts(
        &self,
        task: &SeedTaskName,
        seed: &SeedDefinition,
    ) -> Result<SeedTaskSummary, SeedTaskExecutionError> {
        let generated = generate_demo_accounts(seed)?;
        let shared_hash = self.hasher.hash(SEED_ACCOUNT_PASSWORD).await?;
        let mut written = 0;
        let mut skipped = 0;
        for account in generated {
            let email =
                EmailAddress::new(&account.email).map_err(SeedTaskExecutionError::Identity)?;
            if self.accounts.find_by_email(&email).await?.is_some() {
                skipped += 1;
                continue;
            }
            let display_name = DisplayName::new(account.display_name)
                .map_err(SeedTaskExecutionError::Identity)?;
            let phone = account
                .phone
                .map(ContactPhone::new)
                .transpose()
                .map_err(SeedTaskExecutionError::Identity)?;
            let new_account = NewAccount {
                id: AccountId::from_uuid(account.id),
                email,
                display_name,
                phone,
                password_hash: shared_hash.clone(),
                role: Role::Staff,
                permissions: PermissionFlags::none(),
                must_change_password: false,
                created_at: self.clock.utc(),
            };
            match self.accounts.insert(new_account).await {
                Ok(_) => written += 1,
                // Lost a race with a concurrent run; the row is in place.
                Err(AccountRepositoryError::Duplicate { .. }) => skipped += 1,
                Err(error) => return Err(error.into()),
            }
        }
        Ok(SeedTaskSummary {
            task: task.clone(),
            written,
            skipped,
        })
    }

    /// Write the demo complaints, attributed to the deterministic account
    /// stream and backdated by each row's age.
    async fn seed_complaints(
        &self,
        task: &SeedTaskName,
        seed: &SeedDefinition,
    ) -> Result<SeedTaskSummary, SeedTaskExecutionError> {
        let submitters = generate_demo_accounts(seed)?;
        let generated = generate_demo_complaints(&self.registry, seed)?;
        let now = self.clock.utc();
        let mut written = 0;
        let mut skipped = 0;
        for complaint in generated {
            let id = ComplaintId::from_uuid(complaint.id);
            if self.complaints.find_by_id(&id).await?.is_some() {
                skipped += 1;
                continue;
            }
            let submitter = submitters.get(complaint.submitter_index).ok_or(
                SeedTaskExecutionError::UnknownSubmitter {
                    index: complaint.submitter_index,
                },
            )?;
            let title =
                ComplaintTitle::new(&complaint.title).map_err(SeedTaskExecutionError::Complaint)?;
            let description = ComplaintDescription::new(&complaint.description)
                .map_err(SeedTaskExecutionError::Complaint)?;
            let location = Location::new(
                &complaint.street_line,
                degrees(complaint.latitude_microdeg),
                degrees(complaint.longitude_microdeg),
            )
            .map_err(SeedTaskExecutionError::Complaint)?;
            let new_complaint = NewComplaint {
                id,
                title,
                description,
                location,
                image_urls: Vec::new(),
                submitted_by: AccountId::from_uuid(submitter.id),
                created_at: now - chrono::Duration::hours(i64::from(complaint.age_hours)),
            };
            self.complaints.insert(new_complaint).await?;
            written += 1;
        }
        Ok(SeedTaskSummary {
            task: task.clone(),
            written,
            skipped,
        })
    }

    /// Apply the generated vote tallies to complaints still at zero votes.
    ///
    /// Rows that already carry votes are left alone, so a re-run does not
    /// inflate the counters.
    async fn seed_votes(
        &self,
        task: &SeedTaskName,
        seed: &SeedDefinition,
    ) -> Result<SeedTaskSummary, SeedTaskExecutionError> {
        let generated = generate_demo_complaints(&self.registry, seed)?;
        let mut written = 0;
        let mut skipped = 0;
        for complaint in generated {
            if complaint.votes == 0 {
                skipped += 1;
                continue;
            }
            let id = ComplaintId::from_uuid(complaint.id);
            match self.complaints.find_by_id(&id).await? {
                Some(stored) if stored.vote_count == 0 => {}
                _ => {
                    skipped += 1;
                    continue;
                }
            }
            match self
                .complaints
                .increment_votes(&id, i64::from(complaint.votes))
                .await?
            {
                Some(_) => written += 1,
                None => skipped += 1,
            }
        }
        Ok(SeedTaskSummary {
            task: task.clone(),
            written,
            skipped,
        })
    }
}

/// Convert the generator's microdegree coordinates to degrees.
fn degrees(microdegrees: i32) -> f64 {
    f64::from(microdegrees) / 1_000_000.0
}
