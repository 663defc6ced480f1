//! Complaint API handlers.
//!
//! Submission and voting are open to any authenticated account; triage
//! operations (status, assignment, deletion) additionally require the
//! matching permission flag on the caller's token. Listing and reading are
//! public.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountId;
use crate::domain::complaint::{
    Complaint, ComplaintDescription, ComplaintId, ComplaintStatus, ComplaintTitle, Location,
    NewComplaint, validate_image_urls,
};
use crate::domain::ports::{ComplaintListFilter, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::domain::{ApiFailure, ApiResult};
use crate::inbound::http::auth::AuthenticatedAccount;
use crate::inbound::http::schemas::ErrorEnvelopeSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::ViolationCollector;

/// Location part of a complaint submission.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LocationBody {
    pub line: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Submission request body for `POST /api/v1/complaints`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintRequest {
    pub title: String,
    pub description: String,
    pub location: LocationBody,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Status-change request body for `PATCH /api/v1/complaints/{id}/status`.
///
/// The status arrives as a raw string and is parsed explicitly so an unknown
/// value produces a field violation instead of a deserialisation rejection.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Assignment request body for `POST /api/v1/complaints/{id}/assign`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assignee_id: String,
}

/// Vote response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub vote_count: i64,
}

/// Public view of a complaint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintView {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: ComplaintId,
    pub title: String,
    pub description: String,
    pub location: LocationBody,
    pub image_urls: Vec<String>,
    /// Lifecycle status: `pending`, `in-progress`, `resolved`, or `rejected`.
    #[schema(value_type = String, example = "pending")]
    pub status: ComplaintStatus,
    pub vote_count: i64,
    #[schema(value_type = String)]
    pub submitted_by: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub assigned_to: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl From<&Complaint> for ComplaintView {
    fn from(complaint: &Complaint) -> Self {
        Self {
            id: complaint.id,
            title: complaint.title.as_str().to_owned(),
            description: complaint.description.as_str().to_owned(),
            location: LocationBody {
                line: complaint.location.line().to_owned(),
                latitude: complaint.location.latitude(),
                longitude: complaint.location.longitude(),
            },
            image_urls: complaint.image_urls.clone(),
            status: complaint.status,
            vote_count: complaint.vote_count,
            submitted_by: complaint.submitted_by,
            assigned_to: complaint.assigned_to,
            created_at: complaint.created_at,
        }
    }
}

/// Listing query string for `GET /api/v1/complaints`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Narrow the listing to one lifecycle status.
    pub status: Option<String>,
    /// Page size, capped at 100. Defaults to 20.
    pub limit: Option<i64>,
}

fn complaint_not_found() -> ApiFailure {
    ApiFailure::application(404, "Complaint not found")
}

fn parse_complaint_id(raw: &str) -> Result<ComplaintId, ApiFailure> {
    ComplaintId::new(raw).map_err(|error| {
        ApiFailure::validation(vec![crate::domain::FieldViolation::new(
            "id",
            error.to_string(),
        )])
    })
}

/// Check every field of a submission before failing.
fn validate_submission(
    request: SubmitComplaintRequest,
    submitted_by: AccountId,
    created_at: DateTime<Utc>,
) -> Result<NewComplaint, ApiFailure> {
    let mut collector = ViolationCollector::new();
    let title = collector.check("title", ComplaintTitle::new(&request.title));
    let description =
        collector.check("description", ComplaintDescription::new(&request.description));
    let location = collector.check(
        "location",
        Location::new(
            &request.location.line,
            request.location.latitude,
            request.location.longitude,
        ),
    );
    collector.check("imageUrls", validate_image_urls(&request.image_urls));
    collector.finish()?;

    match (title, description, location) {
        (Some(title), Some(description), Some(location)) => Ok(NewComplaint {
            id: ComplaintId::random(),
            title,
            description,
            location,
            image_urls: request.image_urls,
            submitted_by,
            created_at,
        }),
        _ => Err(ApiFailure::unknown(
            "submission validation passed without producing values",
        )),
    }
}

fn build_list_filter(query: ListQuery) -> Result<ComplaintListFilter, ApiFailure> {
    let mut collector = ViolationCollector::new();
    let status = collector.check_optional(
        "status",
        query.status.as_deref().map(ComplaintStatus::try_from),
    );
    if matches!(query.limit, Some(limit) if limit < 1) {
        collector.push("limit", "limit must be a positive integer");
    }
    collector.finish()?;

    Ok(ComplaintListFilter {
        status,
        limit: query.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT),
    })
}

/// Submit a new complaint.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = SubmitComplaintRequest,
    responses(
        (status = 201, description = "Complaint recorded", body = ComplaintView),
        (status = 400, description = "Validation error", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["complaints"],
    operation_id = "submitComplaint"
)]
#[post("/complaints")]
pub async fn submit(
    account: AuthenticatedAccount,
    state: web::Data<HttpState>,
    payload: web::Json<SubmitComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let new_complaint = validate_submission(
        payload.into_inner(),
        *account.account_id(),
        state.clock.utc(),
    )?;
    let complaint = state.complaints.insert(new_complaint).await?;
    Ok(HttpResponse::Created().json(ComplaintView::from(&complaint)))
}

/// List complaints, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    params(ListQuery),
    responses(
        (status = 200, description = "Complaints", body = [ComplaintView]),
        (status = 400, description = "Invalid query", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints",
    security([])
)]
#[get("/complaints")]
pub async fn list(
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<ComplaintView>>> {
    let filter = build_list_filter(query.into_inner())?;
    let complaints = state.complaints.list(filter).await?;
    Ok(web::Json(complaints.iter().map(ComplaintView::from).collect()))
}

/// Fetch one complaint.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint", body = ComplaintView),
        (status = 404, description = "No such complaint", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["complaints"],
    operation_id = "getComplaint",
    security([])
)]
#[get("/complaints/{id}")]
pub async fn get_by_id(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ComplaintView>> {
    let id = parse_complaint_id(&path)?;
    let complaint = state
        .complaints
        .find_by_id(&id)
        .await?
        .ok_or_else(complaint_not_found)?;
    Ok(web::Json(ComplaintView::from(&complaint)))
}

/// Move a complaint to a new lifecycle status. Requires `can_resolve`.
#[utoipa::path(
    patch,
    path = "/api/v1/complaints/{id}/status",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintView),
        (status = 400, description = "Unknown status value", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Missing the resolve permission", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such complaint", body = ErrorEnvelopeSchema)
    ),
    tags = ["complaints"],
    operation_id = "updateComplaintStatus"
)]
#[patch("/complaints/{id}/status")]
pub async fn update_status(
    account: AuthenticatedAccount,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<ComplaintView>> {
    account.require_can_resolve()?;
    let id = parse_complaint_id(&path)?;

    let mut collector = ViolationCollector::new();
    let status = collector.check("status", ComplaintStatus::try_from(payload.status.as_str()));
    collector.finish()?;
    let status = status.ok_or_else(|| ApiFailure::unknown("status parsed without a value"))?;

    let complaint = state
        .complaints
        .update_status(&id, status)
        .await?
        .ok_or_else(complaint_not_found)?;
    Ok(web::Json(ComplaintView::from(&complaint)))
}

/// Assign a complaint to a staff account. Requires `can_assign`.
#[utoipa::path(
    post,
    path = "/api/v1/complaints/{id}/assign",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = AssignRequest,
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintView),
        (status = 400, description = "Invalid assignee", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Missing the assign permission", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such complaint or assignee", body = ErrorEnvelopeSchema)
    ),
    tags = ["complaints"],
    operation_id = "assignComplaint"
)]
#[post("/complaints/{id}/assign")]
pub async fn assign(
    account: AuthenticatedAccount,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AssignRequest>,
) -> ApiResult<web::Json<ComplaintView>> {
    account.require_can_assign()?;
    let id = parse_complaint_id(&path)?;

    let mut collector = ViolationCollector::new();
    let assignee = collector.check("assigneeId", AccountId::new(&payload.assignee_id));
    collector.finish()?;
    let assignee =
        assignee.ok_or_else(|| ApiFailure::unknown("assignee parsed without a value"))?;

    if state.accounts.find_by_id(&assignee).await?.is_none() {
        return Err(ApiFailure::application(404, "Assignee account not found"));
    }
    let complaint = state
        .complaints
        .assign(&id, &assignee)
        .await?
        .ok_or_else(complaint_not_found)?;
    Ok(web::Json(ComplaintView::from(&complaint)))
}

/// Delete a complaint. Requires `can_delete`.
#[utoipa::path(
    delete,
    path = "/api/v1/complaints/{id}",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 204, description = "Complaint deleted"),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Missing the delete permission", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such complaint", body = ErrorEnvelopeSchema)
    ),
    tags = ["complaints"],
    operation_id = "deleteComplaint"
)]
#[delete("/complaints/{id}")]
pub async fn remove(
    account: AuthenticatedAccount,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    account.require_can_delete()?;
    let id = parse_complaint_id(&path)?;
    if state.complaints.delete(&id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(complaint_not_found())
    }
}

/// Add one vote to a complaint and return the new tally.
#[utoipa::path(
    post,
    path = "/api/v1/complaints/{id}/vote",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "New vote tally", body = VoteResponse),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such complaint", body = ErrorEnvelopeSchema)
    ),
    tags = ["complaints"],
    operation_id = "voteComplaint"
)]
#[post("/complaints/{id}/vote")]
pub async fn vote(
    _account: AuthenticatedAccount,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VoteResponse>> {
    let id = parse_complaint_id(&path)?;
    let vote_count = state
        .complaints
        .increment_votes(&id, 1)
        .await?
        .ok_or_else(complaint_not_found)?;
    Ok(web::Json(VoteResponse { vote_count }))
}
