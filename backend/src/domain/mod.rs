//! Domain model for the complaint service.
//!
//! Purpose: strongly typed entities, the failure taxonomy, and the service
//! logic behind the operational binaries. Keep types immutable and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//! Adapters stay behind the traits in [`ports`].

pub mod account;
pub mod auth;
pub mod bootstrap;
pub mod complaint;
pub mod failure;
pub mod ports;
pub mod seed_tasks;
pub mod seeding;
pub mod trace_id;

pub use self::account::{
    Account, AccountId, AccountValidationError, ContactPhone, DisplayName, EmailAddress,
    NewAccount, PasswordHash, PermissionFlags, Role,
};
pub use self::auth::{Credentials, CredentialsValidationError};
pub use self::bootstrap::{AdminBootstrapper, BootstrapError, BootstrapOutcome};
pub use self::complaint::{
    Complaint, ComplaintId, ComplaintStatus, ComplaintValidationError, Location, NewComplaint,
};
pub use self::failure::{ApiFailure, ClassifiedError, DiagnosticsMode, FieldViolation, classify};
pub use self::seed_tasks::{SeedTaskExecutionError, SeedTaskExecutor, SeedTaskSummary};
pub use self::seeding::{
    SeedOrchestrator, SeedPlan, SeedPlanError, SeedRunReport, SeedTask, SeedTaskName,
    SeedTaskOutcome,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiFailure, ApiResult};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(ApiFailure::application(403, "Forbidden"))
/// }
/// ```
pub type ApiResult<T> = Result<T, ApiFailure>;
