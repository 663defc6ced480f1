//! OpenAPI schema definitions for the failure envelope.
//!
//! The domain failure types stay framework-agnostic by not deriving
//! `ToSchema`; this module mirrors the classified error envelope for
//! documentation purposes only. The wrappers live in the inbound adapter
//! layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for one entry of the `errors` array in a validation
/// failure.
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldViolation)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldViolationSchema {
    /// Request field the violation applies to.
    #[schema(example = "email")]
    field: String,
    /// Human-readable description of the violation.
    #[schema(example = "email must contain exactly one '@'")]
    message: String,
}

/// OpenAPI schema for [`crate::domain::PermissionFlags`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PermissionFlags)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PermissionFlagsSchema {
    /// Grants the complaint-assignment operation.
    #[schema(rename = "canAssign")]
    can_assign: bool,
    /// Grants the status-update operation.
    #[schema(rename = "canResolve")]
    can_resolve: bool,
    /// Grants the complaint-deletion operation.
    #[schema(rename = "canDelete")]
    can_delete: bool,
}

/// OpenAPI schema for [`crate::domain::ClassifiedError`].
///
/// Every non-2xx response carries this envelope. `success` is always
/// `false`; `errors` appears only on validation failures, and `error` and
/// `stack` only when verbose diagnostics are enabled.
#[derive(ToSchema)]
#[schema(as = crate::domain::ClassifiedError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Always `false` for error responses.
    #[schema(example = false)]
    success: bool,
    /// Human-readable message returned to clients.
    #[schema(example = "Validation Error")]
    message: String,
    /// Per-field violations, present on validation failures.
    errors: Option<Vec<FieldViolationSchema>>,
    /// Internal failure detail; only emitted in verbose diagnostics mode.
    error: Option<String>,
    /// Captured stack trace; only emitted in verbose diagnostics mode.
    stack: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn envelope_schema_has_expected_name() {
        let schema_json = schema_to_json::<ErrorEnvelopeSchema>();
        let name = ErrorEnvelopeSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.ClassifiedError");
        assert!(
            schema_json.contains("success"),
            "schema should contain success field"
        );
        assert!(
            schema_json.contains("stack"),
            "schema should contain stack field"
        );
    }

    #[test]
    fn violation_schema_has_expected_name() {
        let schema_json = schema_to_json::<FieldViolationSchema>();
        let name = FieldViolationSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.FieldViolation");
        assert!(
            schema_json.contains("field"),
            "schema should contain field field"
        );
    }
}
