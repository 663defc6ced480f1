//! HTTP rendering for classified failures.
//!
//! Purpose: keep [`ApiFailure`] transport-agnostic while letting Actix
//! handlers return it directly. The `ResponseError` impl classifies the
//! failure under the installed diagnostics mode and renders the uniform
//! `{"success": false, ...}` envelope; the extractor configs funnel payload
//! rejections through the same path so malformed requests cannot bypass it.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};

use crate::domain::{ApiFailure, DiagnosticsMode, classify};

impl ResponseError for ApiFailure {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let classified = classify(self, DiagnosticsMode::installed());
        HttpResponse::build(self.status_code()).json(classified)
    }
}

/// JSON extractor configuration that keeps body rejections in the envelope.
///
/// The deserialisation detail goes to the operator log via classification;
/// clients see a stable 400 message.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error, _req| {
        ApiFailure::Unknown {
            status: Some(400),
            message: Some("Invalid request body".to_owned()),
            detail: format!("request body rejected: {error}"),
        }
        .into()
    })
}

/// Query extractor configuration mirroring [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|error, _req| {
        ApiFailure::Unknown {
            status: Some(400),
            message: Some("Invalid query string".to_owned()),
            detail: format!("query string rejected: {error}"),
        }
        .into()
    })
}
