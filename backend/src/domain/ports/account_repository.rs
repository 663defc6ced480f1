//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::account::{Account, AccountId, EmailAddress, NewAccount};
use crate::domain::failure::ApiFailure;

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// A unique constraint rejected the write.
        Duplicate { fields: Vec<String> } =>
            "duplicate account value for {fields:?}",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account store query failed: {message}",
    }
}

impl From<AccountRepositoryError> for ApiFailure {
    fn from(error: AccountRepositoryError) -> Self {
        match error {
            AccountRepositoryError::Duplicate { fields } => Self::uniqueness_conflict(fields),
            AccountRepositoryError::Connection { message } => Self::Unknown {
                status: Some(503),
                message: Some("Service temporarily unavailable".to_owned()),
                detail: format!("account store connection failed: {message}"),
            },
            AccountRepositoryError::Query { message } => {
                Self::unknown(format!("account store query failed: {message}"))
            }
        }
    }
}

/// Port for durable account storage.
///
/// Lookups treat email as the natural key; the store enforces its uniqueness
/// and surfaces violations as [`AccountRepositoryError::Duplicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch an account by its normalised email, if one exists.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Fetch an account by id, if one exists.
    async fn find_by_id(&self, id: &AccountId)
    -> Result<Option<Account>, AccountRepositoryError>;

    /// Persist a new account and return it as stored.
    async fn insert(&self, account: NewAccount) -> Result<Account, AccountRepositoryError>;

    /// Count all stored accounts.
    async fn count(&self) -> Result<i64, AccountRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// Lookups return `None`, inserts echo the account back, and the count is
/// always zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountRepository;

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(
        &self,
        _id: &AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, AccountRepositoryError> {
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
    }

    async fn count(&self) -> Result<i64, AccountRepositoryError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::account::{DisplayName, PasswordHash, PermissionFlags, Role};

    fn sample_new_account() -> NewAccount {
        NewAccount {
            id: AccountId::random(),
            email: EmailAddress::new("citizen@example.org").expect("valid email"),
            display_name: DisplayName::new("Sample Citizen").expect("valid name"),
            phone: None,
            password_hash: PasswordHash::new("$2b$10$abcdefghijklmnopqrstuv").expect("hash"),
            role: Role::Staff,
            permissions: PermissionFlags::none(),
            must_change_password: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn fixture_lookups_return_none() {
        let repo = FixtureAccountRepository;
        let email = EmailAddress::new("citizen@example.org").expect("valid email");

        assert!(
            repo.find_by_email(&email)
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
        assert!(
            repo.find_by_id(&AccountId::random())
                .await
                .expect("fixture lookup succeeds")
                .is_none()
        );
    }

    #[tokio::test]
    async fn fixture_insert_echoes_the_account() {
        let repo = FixtureAccountRepository;
        let new_account = sample_new_account();
        let id = new_account.id;

        let stored = repo.insert(new_account).await.expect("fixture insert");
        assert_eq!(*stored.id(), id);
        assert_eq!(stored.email().as_str(), "citizen@example.org");
    }

    #[test]
    fn duplicate_errors_become_uniqueness_conflicts() {
        let failure =
            ApiFailure::from(AccountRepositoryError::duplicate(vec!["email".to_owned()]));
        assert!(matches!(failure, ApiFailure::UniquenessConflict { ref fields } if fields == &["email".to_owned()]));
        assert_eq!(failure.status(), 409);
    }

    #[test]
    fn connection_errors_surface_as_service_unavailable() {
        let failure = ApiFailure::from(AccountRepositoryError::connection("pool exhausted"));
        assert_eq!(failure.status(), 503);
    }

    #[test]
    fn query_errors_fall_back_to_internal() {
        let failure = ApiFailure::from(AccountRepositoryError::query("syntax error"));
        assert_eq!(failure.status(), 500);
    }
}
