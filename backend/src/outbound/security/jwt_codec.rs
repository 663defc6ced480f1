//! JWT-backed `TokenCodec` implementation.
//!
//! Tokens are HS256-signed and carry the account's role and permission
//! flags so request handlers can authorise without a repository round trip.
//! Issue timestamps come from the injected clock; expiry validation on
//! decode is `jsonwebtoken`'s own.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountId, PermissionFlags, Role};
use crate::domain::ports::{IssuedToken, TokenClaims, TokenCodec, TokenCodecError};

/// Token lifetime in hours.
const TOKEN_TTL_HOURS: i64 = 24;

/// Wire form of the claims.
#[derive(Debug, Serialize, Deserialize)]
struct ClaimsDto {
    sub: String,
    role: Role,
    flags: PermissionFlags,
    #[serde(rename = "mustChangePassword")]
    must_change_password: bool,
    iat: i64,
    exp: i64,
}

/// HS256 implementation of the `TokenCodec` port.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl JwtTokenCodec {
    /// Create a codec signing with the given shared secret.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            clock,
        }
    }
}

impl fmt::Debug for JwtTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenCodec")
            .field("secret", &"..")
            .finish()
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, account: &Account) -> Result<IssuedToken, TokenCodecError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + Duration::hours(TOKEN_TTL_HOURS);
        let claims = ClaimsDto {
            sub: account.id().to_string(),
            role: account.role(),
            flags: account.permissions(),
            must_change_password: account.must_change_password(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
                .map_err(|error| TokenCodecError::encoding(error.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, TokenCodecError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = jsonwebtoken::decode::<ClaimsDto>(token, &self.decoding_key, &validation)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => TokenCodecError::expired(),
                _ => TokenCodecError::invalid(error.to_string()),
            })?;

        let claims = data.claims;
        let account_id = AccountId::new(&claims.sub)
            .map_err(|_| TokenCodecError::invalid("subject is not a valid account id"))?;
        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| TokenCodecError::invalid("issued-at timestamp out of range"))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenCodecError::invalid("expiry timestamp out of range"))?;

        Ok(TokenClaims {
            account_id,
            role: claims.role,
            permissions: claims.flags,
            must_change_password: claims.must_change_password,
            issued_at,
            expires_at,
        })
    }
}
