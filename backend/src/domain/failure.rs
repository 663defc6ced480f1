//! Failure taxonomy and classification for the API boundary.
//!
//! Every request-processing failure is funnelled into [`ApiFailure`], the
//! closed set of failure kinds the service recognises. [`classify`] maps one
//! failure to exactly one [`ClassifiedError`]; the HTTP adapter renders that
//! as the uniform `{"success": false, ...}` envelope. Exhaustive matching over
//! the enum gives the total-coverage guarantee at compile time: no failure
//! kind can be added without deciding its classification.

use std::backtrace::Backtrace;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::trace_id::TraceId;

/// Message used when a validation failure is classified.
const VALIDATION_MESSAGE: &str = "Validation Error";
/// Message used when an unclassified failure carries no message of its own.
const INTERNAL_MESSAGE: &str = "Internal Server Error";
/// Field name used when a uniqueness conflict arrives without one.
const FALLBACK_CONFLICT_FIELD: &str = "field";

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Name of the offending request field.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldViolation {
    /// Create a violation for the named field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Closed taxonomy of request-processing failures.
///
/// Ordering of the variants mirrors the classification rules: recognised,
/// fully described failures first, the catch-all last.
///
/// # Examples
/// ```
/// use backend::domain::{ApiFailure, DiagnosticsMode, classify};
///
/// let failure = ApiFailure::invalid_token();
/// let classified = classify(&failure, DiagnosticsMode::Redacted);
/// assert_eq!(classified.status(), 401);
/// assert_eq!(classified.message(), "Invalid token");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiFailure {
    /// An intentional failure carrying its own status and message.
    #[error("{message}")]
    Application {
        status: u16,
        message: String,
        violations: Option<Vec<FieldViolation>>,
    },
    /// The request payload failed field-level validation.
    #[error("validation failed on {} field(s)", violations.len())]
    Validation { violations: Vec<FieldViolation> },
    /// A unique constraint rejected the write.
    #[error("duplicate value for {}", fields.join(", "))]
    UniquenessConflict { fields: Vec<String> },
    /// The bearer token failed verification.
    #[error("invalid token")]
    InvalidToken,
    /// The bearer token is past its expiry.
    #[error("token expired")]
    ExpiredToken,
    /// Anything the other variants do not describe.
    #[error("{detail}")]
    Unknown {
        status: Option<u16>,
        message: Option<String>,
        detail: String,
    },
}

impl ApiFailure {
    /// Create an application failure with an explicit status and message.
    pub fn application(status: u16, message: impl Into<String>) -> Self {
        Self::Application {
            status,
            message: message.into(),
            violations: None,
        }
    }

    /// Create an application failure that also carries field violations.
    pub fn application_with_violations(
        status: u16,
        message: impl Into<String>,
        violations: Vec<FieldViolation>,
    ) -> Self {
        Self::Application {
            status,
            message: message.into(),
            violations: Some(violations),
        }
    }

    /// Create a validation failure from collected field violations.
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    /// Create a uniqueness conflict over the given fields.
    pub fn uniqueness_conflict(fields: Vec<String>) -> Self {
        Self::UniquenessConflict { fields }
    }

    /// Create an invalid-token failure.
    pub fn invalid_token() -> Self {
        Self::InvalidToken
    }

    /// Create an expired-token failure.
    pub fn expired_token() -> Self {
        Self::ExpiredToken
    }

    /// Create an unclassified failure carrying operator detail only.
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown {
            status: None,
            message: None,
            detail: detail.into(),
        }
    }

    /// Create an unclassified failure that carries its own status.
    pub fn unknown_with_status(status: u16, detail: impl Into<String>) -> Self {
        Self::Unknown {
            status: Some(status),
            message: None,
            detail: detail.into(),
        }
    }

    /// HTTP status this failure classifies to.
    ///
    /// Shared by [`classify`] and the HTTP adapter so the response status and
    /// the envelope can never disagree.
    pub fn status(&self) -> u16 {
        match self {
            Self::Application { status, .. } => normalise_status(*status),
            Self::Validation { .. } => 400,
            Self::UniquenessConflict { .. } => 409,
            Self::InvalidToken | Self::ExpiredToken => 401,
            Self::Unknown { status, .. } => normalise_status(status.unwrap_or(500)),
        }
    }
}

/// Clamp a status to the error range; anything else becomes 500.
fn normalise_status(status: u16) -> u16 {
    if (400..=599).contains(&status) {
        status
    } else {
        500
    }
}

/// Controls whether classified errors carry a diagnostic backtrace.
///
/// Installed process-wide once at startup; `Redacted` is the default so a
/// missing configuration value never leaks diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticsMode {
    /// No backtrace in responses. Production default.
    #[default]
    Redacted,
    /// Attach a captured backtrace to every classified error.
    Verbose,
}

static DIAGNOSTICS_MODE: OnceLock<DiagnosticsMode> = OnceLock::new();

impl DiagnosticsMode {
    /// Parse a configuration value; anything other than `verbose` redacts.
    pub fn from_config_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("verbose") => Self::Verbose,
            _ => Self::Redacted,
        }
    }

    /// Install the process-wide mode. First caller wins.
    pub fn install(self) {
        let _ = DIAGNOSTICS_MODE.set(self);
    }

    /// The installed process-wide mode, defaulting to `Redacted`.
    pub fn installed() -> Self {
        DIAGNOSTICS_MODE.get().copied().unwrap_or_default()
    }

    /// Whether responses should carry diagnostics.
    pub fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

/// Normalised, client-facing view of a failure.
///
/// Derived transiently by [`classify`]; never persisted. Serialises as the
/// uniform envelope `{"success": false, "message", "errors"?, "error"?,
/// "stack"?}` — the status travels on the HTTP response line, not the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ClassifiedErrorDto")]
pub struct ClassifiedError {
    status: u16,
    message: String,
    errors: Option<Vec<FieldViolation>>,
    error: Option<String>,
    stack: Option<String>,
}

impl ClassifiedError {
    /// HTTP status code, always within 400..=599.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Human-readable message, stable per failure kind.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field violations when the failure was a validation failure.
    pub fn errors(&self) -> Option<&[FieldViolation]> {
        self.errors.as_deref()
    }

    /// Secondary explanatory string for uniqueness conflicts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Captured backtrace, present only under [`DiagnosticsMode::Verbose`].
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

#[derive(Debug, Clone, Serialize)]
struct ClassifiedErrorDto {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldViolation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl From<ClassifiedError> for ClassifiedErrorDto {
    fn from(value: ClassifiedError) -> Self {
        Self {
            success: false,
            message: value.message,
            errors: value.errors,
            error: value.error,
            stack: value.stack,
        }
    }
}

/// Map a failure to exactly one classified error, first-match-wins.
///
/// Classification is total: every [`ApiFailure`] produces a response with a
/// status in 400..=599. Unclassified failures are logged with their full
/// detail (and the request trace id when one is in scope) before being
/// reduced to their own status/message or the generic internal response.
///
/// # Examples
/// ```
/// use backend::domain::{ApiFailure, DiagnosticsMode, FieldViolation, classify};
///
/// let failure = ApiFailure::validation(vec![FieldViolation::new("email", "email is required")]);
/// let classified = classify(&failure, DiagnosticsMode::Redacted);
/// assert_eq!(classified.status(), 400);
/// assert_eq!(classified.message(), "Validation Error");
/// assert_eq!(classified.errors().map(<[_]>::len), Some(1));
/// ```
pub fn classify(failure: &ApiFailure, mode: DiagnosticsMode) -> ClassifiedError {
    let status = failure.status();
    let mut classified = match failure {
        ApiFailure::Application {
            message,
            violations,
            ..
        } => ClassifiedError {
            status,
            message: message.clone(),
            errors: violations.clone(),
            error: None,
            stack: None,
        },
        ApiFailure::Validation { violations } => ClassifiedError {
            status,
            message: VALIDATION_MESSAGE.to_owned(),
            errors: Some(violations.clone()),
            error: None,
            stack: None,
        },
        ApiFailure::UniquenessConflict { fields } => {
            let field = fields.first().map_or(FALLBACK_CONFLICT_FIELD, String::as_str);
            ClassifiedError {
                status,
                message: format!("Duplicate {field} value"),
                errors: None,
                error: Some(format!("{field} must be unique")),
                stack: None,
            }
        }
        ApiFailure::InvalidToken => ClassifiedError {
            status,
            message: "Invalid token".to_owned(),
            errors: None,
            error: None,
            stack: None,
        },
        ApiFailure::ExpiredToken => ClassifiedError {
            status,
            message: "Token expired".to_owned(),
            errors: None,
            error: None,
            stack: None,
        },
        ApiFailure::Unknown {
            message, detail, ..
        } => {
            log_unclassified(detail);
            ClassifiedError {
                status,
                message: message.clone().unwrap_or_else(|| INTERNAL_MESSAGE.to_owned()),
                errors: None,
                error: None,
                stack: None,
            }
        }
    };

    if mode.is_verbose() {
        classified.stack = Some(Backtrace::force_capture().to_string());
    }
    classified
}

fn log_unclassified(detail: &str) {
    match TraceId::current() {
        Some(trace_id) => {
            error!(%trace_id, detail, "unclassified failure reached the API boundary");
        }
        None => error!(detail, "unclassified failure reached the API boundary"),
    }
}
