//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (accounts,
//!   complaints, health)
//! - **Schemas**: Request and response bodies, plus the failure envelope
//!   wrappers ([`ErrorEnvelopeSchema`], [`FieldViolationSchema`]) that
//!   provide OpenAPI definitions without coupling domain types to the
//!   utoipa framework
//! - **Security**: Bearer token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::accounts::{
    AccountView, LoginRequest, LoginResponse, RegisterRequest,
};
use crate::inbound::http::complaints::{
    AssignRequest, ComplaintView, LocationBody, SubmitComplaintRequest, UpdateStatusRequest,
    VoteResponse,
};
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, FieldViolationSchema, PermissionFlagsSchema,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Curbside backend API",
        description = "HTTP interface for complaint submission, triage, and health probes.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::complaints::submit,
        crate::inbound::http::complaints::list,
        crate::inbound::http::complaints::get_by_id,
        crate::inbound::http::complaints::update_status,
        crate::inbound::http::complaints::assign,
        crate::inbound::http::complaints::remove,
        crate::inbound::http::complaints::vote,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        AccountView,
        SubmitComplaintRequest,
        UpdateStatusRequest,
        AssignRequest,
        ComplaintView,
        LocationBody,
        VoteResponse,
        ErrorEnvelopeSchema,
        FieldViolationSchema,
        PermissionFlagsSchema,
    )),
    tags(
        (name = "accounts", description = "Registration and authentication"),
        (name = "complaints", description = "Complaint submission and triage"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ENVELOPE_SCHEMA_NAME: &str = "crate.domain.ClassifiedError";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_envelope_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get(ENVELOPE_SCHEMA_NAME).expect("envelope schema");

        assert_object_schema_has_field(envelope, "success");
        assert_object_schema_has_field(envelope, "message");
    }

    #[test]
    fn openapi_registers_all_complaint_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/accounts",
            "/api/v1/login",
            "/api/v1/complaints",
            "/api/v1/complaints/{id}",
            "/api/v1/complaints/{id}/status",
            "/api/v1/complaints/{id}/assign",
            "/api/v1/complaints/{id}/vote",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "document should describe {path}"
            );
        }
    }
}
