//! Port for bearer-token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::account::{Account, AccountId, PermissionFlags, Role};
use crate::domain::failure::ApiFailure;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token codec adapters.
    pub enum TokenCodecError {
        /// The token was well-formed but past its expiry.
        Expired => "token expired",
        /// The token failed signature or shape checks.
        Invalid { message: String } =>
            "invalid token: {message}",
        /// Encoding a fresh token failed.
        Encoding { message: String } =>
            "token encoding failed: {message}",
    }
}

impl From<TokenCodecError> for ApiFailure {
    fn from(error: TokenCodecError) -> Self {
        match error {
            TokenCodecError::Expired => Self::expired_token(),
            TokenCodecError::Invalid { .. } => Self::invalid_token(),
            TokenCodecError::Encoding { message } => {
                Self::unknown(format!("token encoding failed: {message}"))
            }
        }
    }
}

/// Claims carried by a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub account_id: AccountId,
    pub role: Role,
    pub permissions: PermissionFlags,
    pub must_change_password: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Port for stateless token issue/verify.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Issue a signed token for the account.
    fn issue(&self, account: &Account) -> Result<IssuedToken, TokenCodecError>;

    /// Verify a token string and return its claims.
    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError>;
}

/// Fixture codec that accepts every token as the nil staff account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenCodec;

impl TokenCodec for FixtureTokenCodec {
    fn issue(&self, _account: &Account) -> Result<IssuedToken, TokenCodecError> {
        Ok(IssuedToken {
            token: "fixture-token".to_owned(),
            expires_at: Utc::now() + Duration::hours(24),
        })
    }

    fn decode(&self, _token: &str) -> Result<TokenClaims, TokenCodecError> {
        let now = Utc::now();
        Ok(TokenClaims {
            account_id: AccountId::from_uuid(Uuid::nil()),
            role: Role::Staff,
            permissions: PermissionFlags::none(),
            must_change_password: false,
            issued_at: now,
            expires_at: now + Duration::hours(24),
        })
    }
}
