//! Credential-hashing and bearer-token adapters.
//!
//! Implements the `PasswordHasher` and `TokenCodec` ports with `bcrypt` and
//! HS256 JWTs respectively. Both keep secret material out of `Debug` output.

mod bcrypt_hasher;
mod jwt_codec;

pub use bcrypt_hasher::{BCRYPT_COST, BcryptPasswordHasher};
pub use jwt_codec::JwtTokenCodec;
