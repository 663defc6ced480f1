//! Port for credential hashing.

use async_trait::async_trait;

use crate::domain::account::PasswordHash;
use crate::domain::failure::ApiFailure;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing the plaintext failed.
        Hashing { message: String } =>
            "password hashing failed: {message}",
        /// Comparing a plaintext against a stored hash failed.
        Verification { message: String } =>
            "password verification failed: {message}",
    }
}

impl From<PasswordHasherError> for ApiFailure {
    fn from(error: PasswordHasherError) -> Self {
        Self::unknown(error.to_string())
    }
}

/// Port for salted one-way password hashing.
///
/// Hashing is CPU-bound, so adapters are expected to move the work off the
/// async executor; the async signatures leave room for that.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a plaintext password against a stored hash.
    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}

/// Fixture hasher with a transparent, reversible scheme.
///
/// Produces `fixture:<plaintext>` so tests can drive the full hash-then-verify
/// flow without paying for a real key-derivation function.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        PasswordHash::new(format!("fixture:{plaintext}"))
            .map_err(|error| PasswordHasherError::hashing(error.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hash.expose() == format!("fixture:{plaintext}"))
    }
}
