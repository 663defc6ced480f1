//! Bcrypt-backed `PasswordHasher` implementation.

use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::account::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Work factor applied to every fresh hash.
pub const BCRYPT_COST: u32 = 10;

/// Bcrypt implementation of the `PasswordHasher` port.
///
/// Key derivation at this cost takes tens of milliseconds, so both
/// operations run on the blocking thread pool rather than on the async
/// executor.
#[derive(Debug, Default, Clone, Copy)]
pub struct BcryptPasswordHasher;

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let hashed = task::spawn_blocking(move || bcrypt::hash(plaintext.as_str(), BCRYPT_COST))
            .await
            .map_err(|error| PasswordHasherError::hashing(error.to_string()))?
            .map_err(|error| PasswordHasherError::hashing(error.to_string()))?;

        PasswordHash::new(hashed).map_err(|error| PasswordHasherError::hashing(error.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let hash = hash.expose().to_owned();

        task::spawn_blocking(move || bcrypt::verify(plaintext.as_str(), &hash))
            .await
            .map_err(|error| PasswordHasherError::verification(error.to_string()))?
            .map_err(|error| PasswordHasherError::verification(error.to_string()))
    }
}
