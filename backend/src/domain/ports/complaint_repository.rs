//! Port for complaint persistence.

use async_trait::async_trait;

use crate::domain::account::AccountId;
use crate::domain::complaint::{Complaint, ComplaintId, ComplaintStatus, NewComplaint};
use crate::domain::failure::ApiFailure;

use super::define_port_error;

/// Page size applied when a listing does not ask for one.
pub const DEFAULT_LIST_LIMIT: i64 = 20;
/// Hard ceiling on listing page size.
pub const MAX_LIST_LIMIT: i64 = 100;

define_port_error! {
    /// Errors raised by complaint repository adapters.
    pub enum ComplaintRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "complaint store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "complaint store query failed: {message}",
    }
}

impl From<ComplaintRepositoryError> for ApiFailure {
    fn from(error: ComplaintRepositoryError) -> Self {
        match error {
            ComplaintRepositoryError::Connection { message } => Self::Unknown {
                status: Some(503),
                message: Some("Service temporarily unavailable".to_owned()),
                detail: format!("complaint store connection failed: {message}"),
            },
            ComplaintRepositoryError::Query { message } => {
                Self::unknown(format!("complaint store query failed: {message}"))
            }
        }
    }
}

/// Listing filter: newest complaints first, optionally narrowed by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplaintListFilter {
    pub status: Option<ComplaintStatus>,
    pub limit: i64,
}

impl Default for ComplaintListFilter {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Port for durable complaint storage.
///
/// Mutations against a missing complaint return `None` (or `false` for
/// deletes) rather than an error; the caller decides how absence surfaces.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Persist a new complaint and return it as stored.
    async fn insert(&self, complaint: NewComplaint)
    -> Result<Complaint, ComplaintRepositoryError>;

    /// List complaints, newest first.
    async fn list(
        &self,
        filter: ComplaintListFilter,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError>;

    /// Fetch a complaint by id, if one exists.
    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Move a complaint to a new status, returning the updated row.
    async fn update_status(
        &self,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Assign a complaint to a staff account, returning the updated row.
    async fn assign(
        &self,
        id: &ComplaintId,
        assignee: &AccountId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError>;

    /// Delete a complaint; `false` when no such complaint existed.
    async fn delete(&self, id: &ComplaintId) -> Result<bool, ComplaintRepositoryError>;

    /// Add `by` votes to a complaint and return the new tally.
    async fn increment_votes(
        &self,
        id: &ComplaintId,
        by: i64,
    ) -> Result<Option<i64>, ComplaintRepositoryError>;

    /// Count all stored complaints.
    async fn count(&self) -> Result<i64, ComplaintRepositoryError>;
}

/// Fixture implementation that behaves like an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureComplaintRepository;

#[async_trait]
impl ComplaintRepository for FixtureComplaintRepository {
    async fn insert(
        &self,
        complaint: NewComplaint,
    ) -> Result<Complaint, ComplaintRepositoryError> {
        Ok(Complaint {
            id: complaint.id,
            title: complaint.title,
            description: complaint.description,
            location: complaint.location,
            image_urls: complaint.image_urls,
            status: ComplaintStatus::Pending,
            vote_count: 0,
            submitted_by: complaint.submitted_by,
            assigned_to: None,
            created_at: complaint.created_at,
        })
    }

    async fn list(
        &self,
        _filter: ComplaintListFilter,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        Ok(None)
    }

    async fn update_status(
        &self,
        _id: &ComplaintId,
        _status: ComplaintStatus,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        Ok(None)
    }

    async fn assign(
        &self,
        _id: &ComplaintId,
        _assignee: &AccountId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _id: &ComplaintId) -> Result<bool, ComplaintRepositoryError> {
        Ok(false)
    }

    async fn increment_votes(
        &self,
        _id: &ComplaintId,
        _by: i64,
    ) -> Result<Option<i64>, ComplaintRepositoryError> {
        Ok(None)
    }

    async fn count(&self) -> Result<i64, ComplaintRepositoryError> {
        Ok(0)
    }
}
