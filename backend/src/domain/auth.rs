//! Authentication primitives.
//!
//! Plaintext secrets live only inside [`Credentials`] (zeroised on drop) and
//! the hashing adapter; everything downstream of login sees a
//! [`crate::domain::account::PasswordHash`] or a signed token.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::account::{AccountValidationError, EmailAddress};

/// Minimum plaintext password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// The email part failed address validation.
    Email(AccountValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` satisfies [`EmailAddress`] validation.
/// - `password` is non-empty but otherwise untouched, so stored hashes made
///   from whitespace-bearing secrets still verify.
///
/// # Examples
/// ```
/// use backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("resident@example.org", "hunter2!").unwrap();
/// assert_eq!(creds.email().as_str(), "resident@example.org");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"..")
            .finish()
    }
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
