//! Bearer-token authentication for HTTP handlers.
//!
//! [`AuthenticatedAccount`] is an extractor: handlers that take it only run
//! for requests carrying a verifiable `Authorization: Bearer` token. Missing
//! or bad credentials short-circuit into the classified envelope before the
//! handler body executes. Permission checks stay here too, so handlers state
//! their requirement in one line.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, http::header, web};

use crate::domain::ApiFailure;
use crate::domain::account::AccountId;
use crate::domain::ports::TokenClaims;
use crate::inbound::http::state::HttpState;

/// Verified caller identity, decoded from the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    claims: TokenClaims,
}

impl AuthenticatedAccount {
    /// Account the token was issued for.
    pub fn account_id(&self) -> &AccountId {
        &self.claims.account_id
    }

    /// Full claims carried by the token.
    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    /// Require the assign permission flag.
    pub fn require_can_assign(&self) -> Result<(), ApiFailure> {
        require(self.claims.permissions.can_assign)
    }

    /// Require the resolve permission flag.
    pub fn require_can_resolve(&self) -> Result<(), ApiFailure> {
        require(self.claims.permissions.can_resolve)
    }

    /// Require the delete permission flag.
    pub fn require_can_delete(&self) -> Result<(), ApiFailure> {
        require(self.claims.permissions.can_delete)
    }
}

fn require(granted: bool) -> Result<(), ApiFailure> {
    if granted {
        Ok(())
    } else {
        Err(ApiFailure::application(403, "Forbidden"))
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, ApiFailure> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiFailure::application(401, "Authentication required"))?;
    let raw = value.to_str().map_err(|_| ApiFailure::invalid_token())?;
    raw.strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(ApiFailure::invalid_token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedAccount, ApiFailure> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| ApiFailure::unknown("HTTP state is not registered on the app"))?;
    let token = bearer_token(req)?;
    let claims = state.tokens.decode(token)?;
    Ok(AuthenticatedAccount { claims })
}

impl FromRequest for AuthenticatedAccount {
    type Error = ApiFailure;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
