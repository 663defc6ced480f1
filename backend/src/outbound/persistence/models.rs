//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations; conversion to domain types
//! happens in the repository adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, complaints};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub can_assign: bool,
    pub can_resolve: bool,
    pub can_delete: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub phone: Option<&'a str>,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub can_assign: bool,
    pub can_resolve: bool,
    pub can_delete: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the complaints table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location_line: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_urls: Vec<String>,
    pub status: String,
    pub vote_count: i64,
    pub submitted_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new complaint records.
///
/// `status` and `vote_count` are set by the adapter, not the caller; new
/// complaints always start `pending` with a zero tally.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaints)]
pub(crate) struct NewComplaintRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub location_line: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub image_urls: &'a [String],
    pub status: &'a str,
    pub vote_count: i64,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
}
