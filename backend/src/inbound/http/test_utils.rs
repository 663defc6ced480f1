//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::ports::{
    FixtureAccountRepository, FixtureComplaintRepository, FixturePasswordHasher, FixtureTokenCodec,
};
use crate::inbound::http::state::HttpState;

/// Build an [`HttpState`] backed entirely by fixture ports.
///
/// Tests that need one real port swap it in with struct update syntax:
///
/// ```ignore
/// let state = HttpState { tokens: Arc::new(codec), ..fixture_state() };
/// ```
pub fn fixture_state() -> HttpState {
    HttpState {
        accounts: Arc::new(FixtureAccountRepository),
        complaints: Arc::new(FixtureComplaintRepository),
        hasher: Arc::new(FixturePasswordHasher),
        tokens: Arc::new(FixtureTokenCodec),
        clock: Arc::new(DefaultClock),
    }
}
