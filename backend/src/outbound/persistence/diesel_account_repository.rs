//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! A thin adapter: it translates between Diesel rows and domain accounts and
//! maps database failures onto the port's error type. Email uniqueness is
//! enforced by the `accounts_email_key` constraint; violations surface as
//! [`AccountRepositoryError::Duplicate`] with the offending columns named.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::account::{
    Account, AccountId, ContactPhone, DisplayName, EmailAddress, NewAccount, PasswordHash,
    PermissionFlags, Role,
};
use crate::domain::ports::{AccountRepository, AccountRepositoryError};

use super::diesel_error_mapping;
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    diesel_error_mapping::map_pool_error(error, AccountRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> AccountRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

/// Map insert failures, turning unique violations into duplicates.
fn map_insert_error(error: DieselError) -> AccountRepositoryError {
    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            AccountRepositoryError::duplicate(diesel_error_mapping::unique_violation_fields(
                info.as_ref(),
                "accounts",
            ))
        }
        _ => map_diesel_error(error),
    }
}

fn stored_row_error(id: Uuid, error: impl std::fmt::Display) -> AccountRepositoryError {
    AccountRepositoryError::query(format!("stored account {id} failed validation: {error}"))
}

/// Convert a database row to a domain account.
///
/// Rows are written through the validating domain constructors, so failure
/// here means the table was modified out of band.
fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let id = row.id;
    let email = EmailAddress::new(&row.email).map_err(|error| stored_row_error(id, error))?;
    let display_name =
        DisplayName::new(row.display_name).map_err(|error| stored_row_error(id, error))?;
    let phone = row
        .phone
        .as_deref()
        .map(ContactPhone::new)
        .transpose()
        .map_err(|error| stored_row_error(id, error))?;
    let password_hash =
        PasswordHash::new(row.password_hash).map_err(|error| stored_row_error(id, error))?;
    let role = Role::try_from(row.role.as_str()).map_err(|error| stored_row_error(id, error))?;
    let permissions = PermissionFlags {
        can_assign: row.can_assign,
        can_resolve: row.can_resolve,
        can_delete: row.can_delete,
    };

    Ok(Account::new(
        AccountId::from_uuid(id),
        email,
        display_name,
        phone,
        password_hash,
        role,
        permissions,
        row.must_change_password,
        row.created_at,
    ))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .filter(accounts::email.eq(email.as_str()))
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn find_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .filter(accounts::id.eq(id.as_uuid()))
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_account).transpose()
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAccountRow {
            id: *account.id.as_uuid(),
            email: account.email.as_str(),
            display_name: account.display_name.as_str(),
            phone: account.phone.as_ref().map(ContactPhone::as_str),
            password_hash: account.password_hash.expose(),
            role: account.role.as_str(),
            can_assign: account.permissions.can_assign,
            can_resolve: account.permissions.can_resolve,
            can_delete: account.permissions.can_delete,
            must_change_password: account.must_change_password,
            created_at: account.created_at,
        };

        let stored = diesel::insert_into(accounts::table)
            .values(&new_row)
            .returning(AccountRow::as_returning())
            .get_result::<AccountRow>(&mut conn)
            .await
            .map_err(map_insert_error)?;

        row_to_account(stored)
    }

    async fn count(&self) -> Result<i64, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        accounts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the error mapping and row conversion.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn sample_row() -> AccountRow {
        AccountRow {
            id: Uuid::new_v4(),
            email: "citizen@example.org".to_owned(),
            display_name: "Sample Citizen".to_owned(),
            phone: Some("+441234567890".to_owned()),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_owned(),
            role: "staff".to_owned(),
            can_assign: false,
            can_resolve: true,
            can_delete: false,
            must_change_password: false,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(mapped, AccountRepositoryError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_a_query_error() {
        let mapped = map_diesel_error(DieselError::NotFound);

        assert!(matches!(mapped, AccountRepositoryError::Query { .. }));
        assert!(mapped.to_string().contains("record not found"));
    }

    #[rstest]
    fn unique_violations_become_duplicates() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );

        let mapped = map_insert_error(error);

        assert!(matches!(mapped, AccountRepositoryError::Duplicate { .. }));
    }

    #[rstest]
    fn other_insert_failures_keep_the_basic_mapping() {
        let mapped = map_insert_error(DieselError::NotFound);
        assert!(matches!(mapped, AccountRepositoryError::Query { .. }));
    }

    #[rstest]
    fn rows_convert_to_domain_accounts() {
        let row = sample_row();
        let id = row.id;

        let account = row_to_account(row).expect("valid row");

        assert_eq!(*account.id().as_uuid(), id);
        assert_eq!(account.email().as_str(), "citizen@example.org");
        assert_eq!(account.role(), Role::Staff);
        assert!(account.permissions().can_resolve);
        assert!(!account.permissions().can_assign);
        assert_eq!(
            account.phone().map(ContactPhone::as_str),
            Some("+441234567890")
        );
    }

    #[rstest]
    fn rows_without_a_phone_convert_cleanly() {
        let mut row = sample_row();
        row.phone = None;

        let account = row_to_account(row).expect("valid row");
        assert!(account.phone().is_none());
    }

    #[rstest]
    fn rows_with_an_unknown_role_are_rejected() {
        let mut row = sample_row();
        row.role = "chancellor".to_owned();

        let error = row_to_account(row).expect_err("must fail");

        assert!(matches!(error, AccountRepositoryError::Query { .. }));
        assert!(error.to_string().contains("failed validation"));
    }
}
