//! Default admin credential bootstrapping.
//!
//! Deployments need one privileged account before anyone can log in. The
//! [`AdminBootstrapper`] guarantees exactly that account exists: it looks the
//! well-known email up first and only writes when nothing is there, so
//! re-running it never touches credentials an operator may have rotated.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::account::{
    AccountId, AccountValidationError, DisplayName, EmailAddress, NewAccount, PermissionFlags,
    Role,
};
use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, PasswordHasher, PasswordHasherError,
};

/// Well-known bootstrap identity.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@curbside.local";
/// Default secret hashed on first boot; rotation is forced via
/// `must_change_password`.
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";
/// Display name given to the bootstrap account.
pub const DEFAULT_ADMIN_DISPLAY_NAME: &str = "Curbside Admin";

/// Errors raised while ensuring the default admin exists.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Account store failed.
    #[error("admin account store error: {0}")]
    Store(#[from] AccountRepositoryError),
    /// Hashing the default secret failed.
    #[error("admin password hashing error: {0}")]
    Hashing(#[from] PasswordHasherError),
    /// The built-in identity constants failed validation.
    #[error("default admin identity is invalid: {0}")]
    Identity(AccountValidationError),
}

/// What a bootstrap run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// `true` when this run created the account.
    pub created: bool,
    /// The well-known admin email, normalised.
    pub email: EmailAddress,
}

/// Idempotently guarantees one superadmin account.
pub struct AdminBootstrapper<R, H> {
    accounts: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> AdminBootstrapper<R, H> {
    /// Create a bootstrapper over the given store, hasher, and clock.
    pub fn new(accounts: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            hasher,
            clock,
        }
    }
}

impl<R, H> AdminBootstrapper<R, H>
where
    R: AccountRepository,
    H: PasswordHasher,
{
    /// Ensure the default admin account exists.
    ///
    /// Looks the account up by email first. When present, nothing is written
    /// and the stored hash stays untouched. When absent, the default secret
    /// is hashed and a superadmin with every permission flag and
    /// `must_change_password` set is persisted. A concurrent bootstrap losing
    /// the insert race is treated as "already present".
    pub async fn ensure_default_admin(&self) -> Result<BootstrapOutcome, BootstrapError> {
        let email = EmailAddress::new(DEFAULT_ADMIN_EMAIL).map_err(BootstrapError::Identity)?;

        if let Some(existing) = self.accounts.find_by_email(&email).await? {
            info!(
                email = %existing.email(),
                "default admin already present; leaving credentials untouched"
            );
            return Ok(BootstrapOutcome {
                created: false,
                email,
            });
        }

        let display_name =
            DisplayName::new(DEFAULT_ADMIN_DISPLAY_NAME).map_err(BootstrapError::Identity)?;
        let password_hash = self.hasher.hash(DEFAULT_ADMIN_PASSWORD).await?;
        let new_account = NewAccount {
            id: AccountId::random(),
            email: email.clone(),
            display_name,
            phone: None,
            password_hash,
            role: Role::Superadmin,
            permissions: PermissionFlags::all(),
            must_change_password: true,
            created_at: self.clock.utc(),
        };

        match self.accounts.insert(new_account).await {
            Ok(account) => {
                warn!(
                    email = %account.email(),
                    "created default admin with well-known credentials; rotate this password"
                );
                Ok(BootstrapOutcome {
                    created: true,
                    email,
                })
            }
            Err(AccountRepositoryError::Duplicate { .. }) => {
                info!(
                    email = %email,
                    "default admin appeared concurrently; leaving credentials untouched"
                );
                Ok(BootstrapOutcome {
                    created: false,
                    email,
                })
            }
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockable::DefaultClock;

    use super::*;
    use crate::domain::account::{Account, PasswordHash};
    use crate::domain::ports::{
        FixturePasswordHasher, MockAccountRepository, MockPasswordHasher,
    };

    fn existing_admin() -> Account {
        Account::new(
            AccountId::random(),
            EmailAddress::new(DEFAULT_ADMIN_EMAIL).expect("valid email"),
            DisplayName::new(DEFAULT_ADMIN_DISPLAY_NAME).expect("valid name"),
            None,
            PasswordHash::new("operator-rotated-hash").expect("valid hash"),
            Role::Superadmin,
            PermissionFlags::all(),
            false,
            Utc::now(),
        )
    }

    fn echo_insert(account: NewAccount) -> Result<Account, AccountRepositoryError> {
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

    #[tokio::test]
    async fn creates_superadmin_with_rotation_flag_when_absent() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        accounts
            .expect_insert()
            .withf(|account: &NewAccount| {
                account.email.as_str() == DEFAULT_ADMIN_EMAIL
                    && account.role == Role::Superadmin
                    && account.permissions == PermissionFlags::all()
                    && account.must_change_password
                    && account.password_hash.expose() == format!("fixture:{DEFAULT_ADMIN_PASSWORD}")
            })
            .times(1)
            .return_once(echo_insert);

        let bootstrapper = AdminBootstrapper::new(
            Arc::new(accounts),
            Arc::new(FixturePasswordHasher),
            Arc::new(DefaultClock),
        );
        let outcome = bootstrapper
            .ensure_default_admin()
            .await
            .expect("bootstrap succeeds");

        assert!(outcome.created);
        assert_eq!(outcome.email.as_str(), DEFAULT_ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn leaves_an_existing_account_untouched() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(Some(existing_admin())));
        accounts.expect_insert().times(0);

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().times(0);

        let bootstrapper = AdminBootstrapper::new(
            Arc::new(accounts),
            Arc::new(hasher),
            Arc::new(DefaultClock),
        );
        let outcome = bootstrapper
            .ensure_default_admin()
            .await
            .expect("bootstrap succeeds");

        assert!(!outcome.created);
    }

    #[tokio::test]
    async fn treats_a_lost_insert_race_as_already_present() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Ok(None));
        accounts
            .expect_insert()
            .times(1)
            .return_once(|_| Err(AccountRepositoryError::duplicate(vec!["email".to_owned()])));

        let bootstrapper = AdminBootstrapper::new(
            Arc::new(accounts),
            Arc::new(FixturePasswordHasher),
            Arc::new(DefaultClock),
        );
        let outcome = bootstrapper
            .ensure_default_admin()
            .await
            .expect("race resolves cleanly");

        assert!(!outcome.created);
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .times(1)
            .return_once(|_| Err(AccountRepositoryError::connection("refused")));

        let bootstrapper = AdminBootstrapper::new(
            Arc::new(accounts),
            Arc::new(FixturePasswordHasher),
            Arc::new(DefaultClock),
        );
        let error = bootstrapper
            .ensure_default_admin()
            .await
            .expect_err("store failure surfaces");

        assert!(matches!(error, BootstrapError::Store(_)));
    }
}
