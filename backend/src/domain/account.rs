//! Account data model.
//!
//! Validated newtypes for every externally supplied account attribute. The
//! constructors are the only way to obtain a value, so an `Account` held
//! anywhere in the system already satisfies the invariants documented here.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;
/// Minimum digits in a contact phone number.
pub const PHONE_DIGITS_MIN: usize = 7;
/// Maximum digits in a contact phone number.
pub const PHONE_DIGITS_MAX: usize = 20;

/// Validation errors returned by the account constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    EmailTooLong { max: usize },
    MalformedEmail,
    EmptyDisplayName,
    DisplayNameTooShort { min: usize },
    DisplayNameTooLong { max: usize },
    DisplayNameInvalidCharacters,
    MalformedPhone,
    PhoneLength { min: usize, max: usize },
    EmptyPasswordHash,
    UnknownRole { value: String },
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "account id must not be empty"),
            Self::InvalidId => write!(f, "account id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::MalformedEmail => write!(
                f,
                "email must contain exactly one @ with text either side and no spaces",
            ),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, or underscores",
            ),
            Self::MalformedPhone => write!(
                f,
                "phone may contain only digits, spaces, dashes, and a leading +",
            ),
            Self::PhoneLength { min, max } => {
                write!(f, "phone must contain between {min} and {max} digits")
            }
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
            Self::UnknownRole { value } => {
                write!(f, "unknown role: {value}")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(Uuid);

impl AccountId {
    /// Validate and construct an [`AccountId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(AccountValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| AccountValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`AccountId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address: trimmed, lowercased, shape-checked.
///
/// ## Invariants
/// - At most [`EMAIL_MAX`] characters.
/// - Exactly one `@`, with non-empty local and domain parts.
/// - No whitespace anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`], normalising case.
    pub fn new(email: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(AccountValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(AccountValidationError::MalformedEmail);
        }
        let mut parts = normalised.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().ok_or(AccountValidationError::MalformedEmail)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(AccountValidationError::MalformedEmail);
        }
        Ok(Self(normalised))
    }

    /// The normalised address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

fn is_display_name_char(value: char) -> bool {
    value.is_ascii_alphanumeric() || value == ' ' || value == '_'
}

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, AccountValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(AccountValidationError::EmptyDisplayName);
        }
        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(AccountValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(AccountValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        if !display_name.chars().all(is_display_name_char) {
            return Err(AccountValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(display_name))
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact phone number, stored as a leading `+` (when given) plus digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactPhone(String);

impl ContactPhone {
    /// Validate and construct a [`ContactPhone`].
    ///
    /// Spaces and dashes are accepted as grouping characters and stripped;
    /// the stored form keeps only the optional `+` and the digits.
    pub fn new(phone: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let raw = phone.as_ref().trim();
        let (prefix, rest) = match raw.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", raw),
        };
        let mut digits = String::with_capacity(rest.len());
        for value in rest.chars() {
            match value {
                '0'..='9' => digits.push(value),
                ' ' | '-' => {}
                _ => return Err(AccountValidationError::MalformedPhone),
            }
        }
        if !(PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits.len()) {
            return Err(AccountValidationError::PhoneLength {
                min: PHONE_DIGITS_MIN,
                max: PHONE_DIGITS_MAX,
            });
        }
        Ok(Self(format!("{prefix}{digits}")))
    }

    /// The normalised number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ContactPhone> for String {
    fn from(value: ContactPhone) -> Self {
        value.0
    }
}

impl TryFrom<String> for ContactPhone {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque password hash.
///
/// Never serialised and never printed: the `Debug` impl redacts the value so
/// an accidental log line cannot leak a stored hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash produced by the hashing adapter or read from storage.
    pub fn new(hash: impl Into<String>) -> Result<Self, AccountValidationError> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err(AccountValidationError::EmptyPasswordHash);
        }
        Ok(Self(hash))
    }

    /// Expose the stored hash for verification or persistence.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Admin,
    Superadmin,
}

impl Role {
    /// Stable wire form of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = AccountValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            other => Err(AccountValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Per-account permission flags checked by the complaint handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFlags {
    pub can_assign: bool,
    pub can_resolve: bool,
    pub can_delete: bool,
}

impl PermissionFlags {
    /// No permissions. The default for self-registered accounts.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every permission. Granted to the bootstrapped superadmin.
    pub fn all() -> Self {
        Self {
            can_assign: true,
            can_resolve: true,
            can_delete: true,
        }
    }
}

/// A persisted account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    email: EmailAddress,
    display_name: DisplayName,
    phone: Option<ContactPhone>,
    password_hash: PasswordHash,
    role: Role,
    permissions: PermissionFlags,
    must_change_password: bool,
    created_at: DateTime<Utc>,
}

impl Account {
    /// Assemble an account from validated components.
    #[expect(clippy::too_many_arguments, reason = "aggregate root constructor")]
    pub fn new(
        id: AccountId,
        email: EmailAddress,
        display_name: DisplayName,
        phone: Option<ContactPhone>,
        password_hash: PasswordHash,
        role: Role,
        permissions: PermissionFlags,
        must_change_password: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            display_name,
            phone,
            password_hash,
            role,
            permissions,
            must_change_password,
            created_at,
        }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    pub fn phone(&self) -> Option<&ContactPhone> {
        self.phone.as_ref()
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> PermissionFlags {
        self.permissions
    }

    pub fn must_change_password(&self) -> bool {
        self.must_change_password
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// An account ready to be persisted; `created_at` comes from the caller's
/// injected clock.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub phone: Option<ContactPhone>,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub permissions: PermissionFlags,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn account_id_round_trips_through_uuid() {
        let id = AccountId::random();
        let reparsed = AccountId::new(id.to_string()).expect("round trip");
        assert_eq!(reparsed, id);
    }

    #[rstest]
    #[case("", AccountValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", AccountValidationError::InvalidId)]
    #[case("not-a-uuid", AccountValidationError::InvalidId)]
    fn account_id_rejects_bad_input(
        #[case] raw: &str,
        #[case] expected: AccountValidationError,
    ) {
        assert_eq!(AccountId::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn email_normalises_case_and_whitespace() {
        let email = EmailAddress::new("  Resident@Example.ORG ").expect("valid email");
        assert_eq!(email.as_str(), "resident@example.org");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("no-at-sign")]
    #[case("@missing-local")]
    #[case("missing-domain@")]
    #[case("two@@ats")]
    #[case("two@at@signs")]
    #[case("spaced name@example.org")]
    fn email_rejects_malformed_input(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_err());
    }

    #[test]
    fn email_rejects_overlong_input() {
        let raw = format!("{}@example.org", "a".repeat(EMAIL_MAX));
        assert_eq!(
            EmailAddress::new(raw).expect_err("must fail"),
            AccountValidationError::EmailTooLong { max: EMAIL_MAX }
        );
    }

    #[rstest]
    #[case("Ada Lovelace")]
    #[case("resident_42")]
    #[case("abc")]
    fn display_name_accepts_valid_input(#[case] raw: &str) {
        assert!(DisplayName::new(raw).is_ok());
    }

    #[rstest]
    #[case("", AccountValidationError::EmptyDisplayName)]
    #[case("ab", AccountValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN })]
    #[case("Ada! Lovelace", AccountValidationError::DisplayNameInvalidCharacters)]
    fn display_name_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: AccountValidationError,
    ) {
        assert_eq!(DisplayName::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn display_name_rejects_overlong_input() {
        let raw = "a".repeat(DISPLAY_NAME_MAX + 1);
        assert_eq!(
            DisplayName::new(raw).expect_err("must fail"),
            AccountValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            }
        );
    }

    #[rstest]
    #[case("+44 20 7946 0958", "+442079460958")]
    #[case("020-7946-0958", "02079460958")]
    #[case("1234567", "1234567")]
    fn phone_normalises_grouping(#[case] raw: &str, #[case] expected: &str) {
        let phone = ContactPhone::new(raw).expect("valid phone");
        assert_eq!(phone.as_str(), expected);
    }

    #[rstest]
    #[case("123456")]
    #[case("123456789012345678901")]
    fn phone_rejects_bad_digit_counts(#[case] raw: &str) {
        assert_eq!(
            ContactPhone::new(raw).expect_err("must fail"),
            AccountValidationError::PhoneLength {
                min: PHONE_DIGITS_MIN,
                max: PHONE_DIGITS_MAX
            }
        );
    }

    #[test]
    fn phone_rejects_letters() {
        assert_eq!(
            ContactPhone::new("+44 CALL ME NOW").expect_err("must fail"),
            AccountValidationError::MalformedPhone
        );
    }

    #[test]
    fn password_hash_debug_redacts_the_value() {
        let hash = PasswordHash::new("$2b$10$abcdefghijklmnopqrstuv").expect("valid hash");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[test]
    fn password_hash_rejects_blank_input() {
        assert_eq!(
            PasswordHash::new("   ").expect_err("must fail"),
            AccountValidationError::EmptyPasswordHash
        );
    }

    #[rstest]
    #[case("staff", Role::Staff)]
    #[case("admin", Role::Admin)]
    #[case("superadmin", Role::Superadmin)]
    fn role_parses_wire_values(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(Role::try_from(raw).expect("known role"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn role_rejects_unknown_values() {
        assert_eq!(
            Role::try_from("moderator").expect_err("must fail"),
            AccountValidationError::UnknownRole {
                value: "moderator".to_owned()
            }
        );
    }

    #[test]
    fn permission_flags_all_sets_every_flag() {
        let flags = PermissionFlags::all();
        assert!(flags.can_assign && flags.can_resolve && flags.can_delete);
        assert_eq!(PermissionFlags::none(), PermissionFlags::default());
    }

    #[test]
    fn permission_flags_serialise_camel_case() {
        let value = serde_json::to_value(PermissionFlags::all()).expect("serialises");
        assert_eq!(value.get("canAssign"), Some(&serde_json::Value::Bool(true)));
        assert!(value.get("can_assign").is_none());
    }
}
