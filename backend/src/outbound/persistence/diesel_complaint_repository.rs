//! PostgreSQL-backed `ComplaintRepository` implementation using Diesel ORM.
//!
//! Listing always returns newest-first pages; mutations against a missing
//! row surface as `None` (or `false` for deletes) so the inbound layer can
//! decide how absence is reported. Vote increments are applied atomically in
//! SQL rather than read-modify-write.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::account::AccountId;
use crate::domain::complaint::{
    Complaint, ComplaintDescription, ComplaintId, ComplaintStatus, ComplaintTitle, Location,
    NewComplaint,
};
use crate::domain::ports::{ComplaintListFilter, ComplaintRepository, ComplaintRepositoryError};

use super::diesel_error_mapping;
use super::models::{ComplaintRow, NewComplaintRow};
use super::pool::{DbPool, PoolError};
use super::schema::complaints;

/// Diesel-backed implementation of the `ComplaintRepository` port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ComplaintRepositoryError {
    diesel_error_mapping::map_pool_error(error, ComplaintRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> ComplaintRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        ComplaintRepositoryError::query,
        ComplaintRepositoryError::connection,
    )
}

fn stored_row_error(id: Uuid, error: impl std::fmt::Display) -> ComplaintRepositoryError {
    ComplaintRepositoryError::query(format!("stored complaint {id} failed validation: {error}"))
}

/// Convert a database row to a domain complaint.
fn row_to_complaint(row: ComplaintRow) -> Result<Complaint, ComplaintRepositoryError> {
    let id = row.id;
    let title = ComplaintTitle::new(&row.title).map_err(|error| stored_row_error(id, error))?;
    let description = ComplaintDescription::new(&row.description)
        .map_err(|error| stored_row_error(id, error))?;
    let location = Location::new(&row.location_line, row.latitude, row.longitude)
        .map_err(|error| stored_row_error(id, error))?;
    let status = ComplaintStatus::try_from(row.status.as_str())
        .map_err(|error| stored_row_error(id, error))?;

    Ok(Complaint {
        id: ComplaintId::from_uuid(id),
        title,
        description,
        location,
        image_urls: row.image_urls,
        status,
        vote_count: row.vote_count,
        submitted_by: AccountId::from_uuid(row.submitted_by),
        assigned_to: row.assigned_to.map(AccountId::from_uuid),
        created_at: row.created_at,
    })
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn insert(
        &self,
        complaint: NewComplaint,
    ) -> Result<Complaint, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewComplaintRow {
            id: *complaint.id.as_uuid(),
            title: complaint.title.as_str(),
            description: complaint.description.as_str(),
            location_line: complaint.location.line(),
            latitude: complaint.location.latitude(),
            longitude: complaint.location.longitude(),
            image_urls: &complaint.image_urls,
            status: ComplaintStatus::Pending.as_str(),
            vote_count: 0,
            submitted_by: *complaint.submitted_by.as_uuid(),
            created_at: complaint.created_at,
        };

        let stored = diesel::insert_into(complaints::table)
            .values(&new_row)
            .returning(ComplaintRow::as_returning())
            .get_result::<ComplaintRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_complaint(stored)
    }

    async fn list(
        &self,
        filter: ComplaintListFilter,
    ) -> Result<Vec<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = complaints::table.into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(complaints::status.eq(status.as_str()));
        }

        let rows: Vec<ComplaintRow> = query
            .order(complaints::created_at.desc())
            .limit(filter.limit)
            .select(ComplaintRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_complaint).collect()
    }

    async fn find_by_id(
        &self,
        id: &ComplaintId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = complaints::table
            .filter(complaints::id.eq(id.as_uuid()))
            .select(ComplaintRow::as_select())
            .first::<ComplaintRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_complaint).transpose()
    }

    async fn update_status(
        &self,
        id: &ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(complaints::table.filter(complaints::id.eq(id.as_uuid())))
            .set(complaints::status.eq(status.as_str()))
            .returning(ComplaintRow::as_returning())
            .get_result::<ComplaintRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_complaint).transpose()
    }

    async fn assign(
        &self,
        id: &ComplaintId,
        assignee: &AccountId,
    ) -> Result<Option<Complaint>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(complaints::table.filter(complaints::id.eq(id.as_uuid())))
            .set(complaints::assigned_to.eq(Some(*assignee.as_uuid())))
            .returning(ComplaintRow::as_returning())
            .get_result::<ComplaintRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_complaint).transpose()
    }

    async fn delete(&self, id: &ComplaintId) -> Result<bool, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(complaints::table.filter(complaints::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn increment_votes(
        &self,
        id: &ComplaintId,
        by: i64,
    ) -> Result<Option<i64>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(complaints::table.filter(complaints::id.eq(id.as_uuid())))
            .set(complaints::vote_count.eq(complaints::vote_count + by))
            .returning(complaints::vote_count)
            .get_result::<i64>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn count(&self) -> Result<i64, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        complaints::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
