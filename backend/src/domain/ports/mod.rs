//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod complaint_repository;
mod password_hasher;
mod seed_task_runner;
mod token_codec;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError, FixtureAccountRepository};
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_repository::{
    ComplaintListFilter, ComplaintRepository, ComplaintRepositoryError, DEFAULT_LIST_LIMIT,
    FixtureComplaintRepository, MAX_LIST_LIMIT,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use seed_task_runner::MockSeedTaskRunner;
pub use seed_task_runner::{FixtureSeedTaskRunner, SeedTaskError, SeedTaskRunner};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{FixtureTokenCodec, IssuedToken, TokenClaims, TokenCodec, TokenCodecError};
