//! Shared Diesel error mapping for the repository adapters.
//!
//! Both repositories expose the same two transport-level failure shapes
//! (connection and query errors), so the folding logic lives here once and
//! each adapter passes its own error constructors.

use diesel::result::DatabaseErrorInformation;
use tracing::debug;

use super::pool::PoolError;

/// Fold pool errors into a repository connection error.
pub(super) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel failures into query/connection errors.
///
/// Closed connections are the only database error treated as a connection
/// failure; everything else, including `NotFound` leaking out of a query
/// that should have used `optional()`, becomes a query error.
pub(super) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Name the columns behind a unique violation.
///
/// PostgreSQL reports the offending columns in the error detail as
/// `Key (email)=(x@example.org) already exists.`; when the detail is absent
/// the constraint name is unpicked instead (`accounts_email_key` names the
/// `email` column). An empty result means the report carried neither.
pub(super) fn unique_violation_fields(
    info: &(dyn DatabaseErrorInformation + Send + Sync),
    table: &str,
) -> Vec<String> {
    if let Some(fields) = info.details().and_then(fields_from_detail) {
        return fields;
    }
    info.constraint_name()
        .and_then(|constraint| field_from_constraint(constraint, table))
        .map(|field| vec![field])
        .unwrap_or_default()
}

fn fields_from_detail(detail: &str) -> Option<Vec<String>> {
    let start = detail.find("Key (")? + "Key (".len();
    let end = start + detail[start..].find(')')?;
    let fields: Vec<String> = detail[start..end]
        .split(',')
        .map(|field| field.trim().to_owned())
        .filter(|field| !field.is_empty())
        .collect();
    if fields.is_empty() { None } else { Some(fields) }
}

fn field_from_constraint(constraint: &str, table: &str) -> Option<String> {
    let unprefixed = constraint
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(constraint);
    let field = unprefixed
        .strip_suffix("_key")
        .or_else(|| unprefixed.strip_suffix("_unique"))
        .or_else(|| unprefixed.strip_suffix("_idx"))
        .unwrap_or(unprefixed);
    if field.is_empty() {
        None
    } else {
        Some(field.to_owned())
    }
}
