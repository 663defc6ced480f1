//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{AccountRepository, ComplaintRepository, PasswordHasher, TokenCodec};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::ports::{
///     FixtureAccountRepository, FixtureComplaintRepository, FixturePasswordHasher,
///     FixtureTokenCodec,
/// };
/// use backend::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     accounts: Arc::new(FixtureAccountRepository),
///     complaints: Arc::new(FixtureComplaintRepository),
///     hasher: Arc::new(FixturePasswordHasher),
///     tokens: Arc::new(FixtureTokenCodec),
///     clock: Arc::new(mockable::DefaultClock),
/// };
/// let _accounts = state.accounts.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountRepository>,
    pub complaints: Arc<dyn ComplaintRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenCodec>,
    pub clock: Arc<dyn Clock>,
}
