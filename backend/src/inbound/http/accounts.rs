//! Account API handlers.
//!
//! ```text
//! POST /api/v1/accounts {"email":"a@b.org","password":"...","displayName":"Ada"}
//! POST /api/v1/login    {"email":"a@b.org","password":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account::{
    Account, AccountId, ContactPhone, DisplayName, EmailAddress, NewAccount, PermissionFlags,
    Role,
};
use crate::domain::auth::{Credentials, PASSWORD_MIN};
use crate::domain::{ApiFailure, ApiResult};
use crate::inbound::http::schemas::{ErrorEnvelopeSchema, PermissionFlagsSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::ViolationCollector;

/// Registration request body for `POST /api/v1/accounts`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: AccountId,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[schema(example = "staff")]
    pub role: String,
    #[schema(value_type = PermissionFlagsSchema)]
    pub permissions: PermissionFlags,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: *account.id(),
            email: account.email().as_str().to_owned(),
            display_name: account.display_name().as_str().to_owned(),
            phone: account.phone().map(|phone| phone.as_str().to_owned()),
            role: account.role().as_str().to_owned(),
            permissions: account.permissions(),
            must_change_password: account.must_change_password(),
            created_at: account.created_at(),
        }
    }
}

/// Successful login response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub account: AccountView,
}

/// Validated registration payload.
struct RegisterPayload {
    email: EmailAddress,
    password: String,
    display_name: DisplayName,
    phone: Option<ContactPhone>,
}

/// Check every field before failing, so the envelope names all of them.
fn validate_registration(request: RegisterRequest) -> Result<RegisterPayload, ApiFailure> {
    let mut collector = ViolationCollector::new();
    let email = collector.check("email", EmailAddress::new(&request.email));
    if request.password.is_empty() {
        collector.push("password", "password is required");
    } else if request.password.chars().count() < PASSWORD_MIN {
        collector.push(
            "password",
            format!("password must be at least {PASSWORD_MIN} characters"),
        );
    }
    let display_name = collector.check("displayName", DisplayName::new(request.display_name));
    let phone = collector.check_optional(
        "phone",
        request
            .phone
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(ContactPhone::new),
    );
    collector.finish()?;

    // finish() returned Ok, so every checked field produced a value.
    match (email, display_name) {
        (Some(email), Some(display_name)) => Ok(RegisterPayload {
            email,
            password: request.password,
            display_name,
            phone,
        }),
        _ => Err(ApiFailure::unknown(
            "registration validation passed without producing values",
        )),
    }
}

/// Register a new account.
///
/// Self-registered accounts start as staff with no permission flags; an
/// administrator grants flags out of band. A duplicate email surfaces as the
/// 409 `Duplicate email value` envelope.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountView),
        (status = 400, description = "Validation error", body = ErrorEnvelopeSchema),
        (status = 409, description = "Email already registered", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["accounts"],
    operation_id = "registerAccount",
    security([])
)]
#[post("/accounts")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = validate_registration(payload.into_inner())?;
    let password_hash = state.hasher.hash(&payload.password).await?;
    let new_account = NewAccount {
        id: AccountId::random(),
        email: payload.email,
        display_name: payload.display_name,
        phone: payload.phone,
        password_hash,
        role: Role::Staff,
        permissions: PermissionFlags::none(),
        must_change_password: false,
        created_at: state.clock.utc(),
    };
    let account = state.accounts.insert(new_account).await?;
    Ok(HttpResponse::Created().json(AccountView::from(&account)))
}

fn invalid_credentials() -> ApiFailure {
    ApiFailure::application(401, "Invalid credentials")
}

/// Authenticate an account and issue a bearer token.
///
/// Every failure along the lookup-and-verify path collapses into the same
/// 401 response so a caller cannot probe which emails are registered.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|_| invalid_credentials())?;

    let account = state
        .accounts
        .find_by_email(credentials.email())
        .await?
        .ok_or_else(invalid_credentials)?;
    let verified = state
        .hasher
        .verify(credentials.password(), account.password_hash())
        .await?;
    if !verified {
        return Err(invalid_credentials());
    }

    let issued = state.tokens.issue(&account)?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        account: AccountView::from(&account),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::account::PasswordHash;
    use crate::domain::ports::{
        AccountRepository, AccountRepositoryError, FixturePasswordHasher, MockAccountRepository,
        PasswordHasher,
    };
    use crate::inbound::http::error::json_config;
    use crate::inbound::http::test_utils::fixture_state;

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .service(register)
            .service(login)
    }

    fn valid_registration() -> Value {
        json!({
            "email": "resident@example.org",
            "password": "hunter2hunter2",
            "displayName": "Ada Lovelace",
            "phone": "+44 20 7946 0958"
        })
    }

    async fn stored_account() -> Account {
        let hash = FixturePasswordHasher
            .hash("hunter2hunter2")
            .await
            .expect("fixture hash");
        Account::new(
            AccountId::random(),
            EmailAddress::new("resident@example.org").expect("valid email"),
            DisplayName::new("Ada Lovelace").expect("valid name"),
            None,
            hash,
            Role::Staff,
            PermissionFlags::none(),
            false,
            Utc::now(),
        )
    }

    #[actix_web::test]
    async fn registration_creates_a_staff_account_without_flags() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_insert()
            .withf(|account: &NewAccount| {
                account.email.as_str() == "resident@example.org"
                    && account.role == Role::Staff
                    && account.permissions == PermissionFlags::none()
                    && !account.must_change_password
                    && account.password_hash.expose() == "fixture:hunter2hunter2"
            })
            .times(1)
            .returning(|account| {
                Ok(Account::new(
                    account.id,
                    account.email,
                    account.display_name,
                    account.phone,
                    account.password_hash,
                    account.role,
                    account.permissions,
                    account.must_change_password,
                    account.created_at,
                ))
            });
        let state = HttpState {
            accounts: Arc::new(accounts) as Arc<dyn AccountRepository>,
            ..fixture_state()
        };
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/accounts")
                .set_json(valid_registration())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("email").and_then(Value::as_str),
            Some("resident@example.org")
        );
        assert_eq!(body.get("role").and_then(Value::as_str), Some("staff"));
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn registration_reports_every_invalid_field_in_order() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/accounts")
                .set_json(json!({
                    "email": "not-an-email",
                    "password": "short",
                    "displayName": "!",
                    "phone": "1"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Validation Error")
        );
        let errors = body
            .get("errors")
            .and_then(Value::as_array)
            .expect("errors array");
        let fields: Vec<&str> = errors
            .iter()
            .filter_map(|entry| entry.get("field").and_then(Value::as_str))
            .collect();
        assert_eq!(fields, ["email", "password", "displayName", "phone"]);
    }

    #[actix_web::test]
    async fn duplicate_registration_maps_to_the_conflict_envelope() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_insert()
            .times(1)
            .returning(|_| Err(AccountRepositoryError::duplicate(vec!["email".to_owned()])));
        let state = HttpState {
            accounts: Arc::new(accounts) as Arc<dyn AccountRepository>,
            ..fixture_state()
        };
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/accounts")
                .set_json(valid_registration())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Duplicate email value")
        );
        assert_eq!(
            body.get("error").and_then(Value::as_str),
            Some("email must be unique")
        );
    }

    #[actix_web::test]
    async fn login_returns_a_token_and_the_account_view() {
        let account = stored_account().await;
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(account)));
        let state = HttpState {
            accounts: Arc::new(accounts) as Arc<dyn AccountRepository>,
            ..fixture_state()
        };
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_json(json!({
                    "email": "resident@example.org",
                    "password": "hunter2hunter2"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("token").and_then(Value::as_str),
            Some("fixture-token")
        );
        assert_eq!(
            body.pointer("/account/mustChangePassword"),
            Some(&Value::Bool(false))
        );
    }

    #[rstest]
    #[case(json!({"email": "resident@example.org", "password": "wrong-password"}))]
    #[case(json!({"email": "unknown@example.org", "password": "hunter2hunter2"}))]
    #[case(json!({"email": "not-an-email", "password": "hunter2hunter2"}))]
    #[actix_web::test]
    async fn bad_credentials_collapse_into_one_response(#[case] payload: Value) {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_email().returning(|email| {
            if email.as_str() == "resident@example.org" {
                // Wrong-password case: the account exists.
                Ok(Some(Account::new(
                    AccountId::random(),
                    email.clone(),
                    DisplayName::new("Ada Lovelace").expect("valid name"),
                    None,
                    PasswordHash::new("fixture:hunter2hunter2").expect("valid hash"),
                    Role::Staff,
                    PermissionFlags::none(),
                    false,
                    Utc::now(),
                )))
            } else {
                Ok(None)
            }
        });
        let state = HttpState {
            accounts: Arc::new(accounts) as Arc<dyn AccountRepository>,
            ..fixture_state()
        };
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Invalid credentials")
        );
    }

    #[actix_web::test]
    async fn malformed_json_bodies_use_the_envelope() {
        let app = actix_test::init_service(test_app(fixture_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/accounts")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("success"), Some(&Value::Bool(false)));
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Invalid request body")
        );
    }
}
