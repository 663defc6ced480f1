//! Complaint data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::account::AccountId;

/// Minimum allowed length for a complaint title.
pub const TITLE_MIN: usize = 3;
/// Maximum allowed length for a complaint title.
pub const TITLE_MAX: usize = 120;
/// Minimum allowed length for a complaint description.
pub const DESCRIPTION_MIN: usize = 10;
/// Maximum allowed length for a complaint description.
pub const DESCRIPTION_MAX: usize = 2000;
/// Maximum allowed length for the location line.
pub const LOCATION_LINE_MAX: usize = 160;
/// Maximum number of image references per complaint.
pub const IMAGE_URLS_MAX: usize = 5;
/// Maximum length of a single image reference.
pub const IMAGE_URL_MAX: usize = 512;

/// Validation errors returned by the complaint constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum ComplaintValidationError {
    EmptyId,
    InvalidId,
    EmptyTitle,
    TitleTooShort { min: usize },
    TitleTooLong { max: usize },
    DescriptionTooShort { min: usize },
    DescriptionTooLong { max: usize },
    EmptyLocationLine,
    LocationLineTooLong { max: usize },
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
    TooManyImages { max: usize },
    EmptyImageReference { index: usize },
    ImageReferenceTooLong { index: usize, max: usize },
    MalformedImageReference { index: usize },
    UnknownStatus { value: String },
}

impl fmt::Display for ComplaintValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "complaint id must not be empty"),
            Self::InvalidId => write!(f, "complaint id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooShort { min } => {
                write!(f, "title must be at least {min} characters")
            }
            Self::TitleTooLong { max } => {
                write!(f, "title must be at most {max} characters")
            }
            Self::DescriptionTooShort { min } => {
                write!(f, "description must be at least {min} characters")
            }
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::EmptyLocationLine => write!(f, "location line must not be empty"),
            Self::LocationLineTooLong { max } => {
                write!(f, "location line must be at most {max} characters")
            }
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude {value} is outside -90..=90")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude {value} is outside -180..=180")
            }
            Self::TooManyImages { max } => {
                write!(f, "at most {max} image references are allowed")
            }
            Self::EmptyImageReference { index } => {
                write!(f, "image reference {index} must not be empty")
            }
            Self::ImageReferenceTooLong { index, max } => {
                write!(f, "image reference {index} must be at most {max} characters")
            }
            Self::MalformedImageReference { index } => write!(
                f,
                "image reference {index} must be an absolute URL or a /-rooted path",
            ),
            Self::UnknownStatus { value } => write!(f, "unknown complaint status: {value}"),
        }
    }
}

impl std::error::Error for ComplaintValidationError {}

/// Stable complaint identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintId(Uuid);

impl ComplaintId {
    /// Validate and construct a [`ComplaintId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ComplaintValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(ComplaintValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| ComplaintValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`ComplaintId`].
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

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ComplaintId> for String {
    fn from(value: ComplaintId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ComplaintId {
    type Error = ComplaintValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Complaint title, trimmed, within [`TITLE_MIN`]..=[`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintTitle(String);

impl ComplaintTitle {
    /// Validate and construct a [`ComplaintTitle`].
    pub fn new(title: impl AsRef<str>) -> Result<Self, ComplaintValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ComplaintValidationError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length < TITLE_MIN {
            return Err(ComplaintValidationError::TitleTooShort { min: TITLE_MIN });
        }
        if length > TITLE_MAX {
            return Err(ComplaintValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComplaintTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ComplaintTitle> for String {
    fn from(value: ComplaintTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for ComplaintTitle {
    type Error = ComplaintValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Complaint description, trimmed, within
/// [`DESCRIPTION_MIN`]..=[`DESCRIPTION_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintDescription(String);

impl ComplaintDescription {
    /// Validate and construct a [`ComplaintDescription`].
    pub fn new(description: impl AsRef<str>) -> Result<Self, ComplaintValidationError> {
        let trimmed = description.as_ref().trim();
        let length = trimmed.chars().count();
        if length < DESCRIPTION_MIN {
            return Err(ComplaintValidationError::DescriptionTooShort {
                min: DESCRIPTION_MIN,
            });
        }
        if length > DESCRIPTION_MAX {
            return Err(ComplaintValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ComplaintDescription> for String {
    fn from(value: ComplaintDescription) -> Self {
        value.0
    }
}

impl TryFrom<String> for ComplaintDescription {
    type Error = ComplaintValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Where a complaint was raised: a free-text line plus WGS84 coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    line: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Validate and construct a [`Location`].
    pub fn new(
        line: impl AsRef<str>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, ComplaintValidationError> {
        let line = line.as_ref().trim();
        if line.is_empty() {
            return Err(ComplaintValidationError::EmptyLocationLine);
        }
        if line.chars().count() > LOCATION_LINE_MAX {
            return Err(ComplaintValidationError::LocationLineTooLong {
                max: LOCATION_LINE_MAX,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
            return Err(ComplaintValidationError::LatitudeOutOfRange { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
            return Err(ComplaintValidationError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            line: line.to_owned(),
            latitude,
            longitude,
        })
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Validate a set of image references.
///
/// Each reference is either an absolute URL or a `/`-rooted path; images are
/// stored elsewhere and the service never fetches or processes them.
pub fn validate_image_urls(urls: &[String]) -> Result<(), ComplaintValidationError> {
    if urls.len() > IMAGE_URLS_MAX {
        return Err(ComplaintValidationError::TooManyImages {
            max: IMAGE_URLS_MAX,
        });
    }
    for (index, value) in urls.iter().enumerate() {
        if value.trim().is_empty() {
            return Err(ComplaintValidationError::EmptyImageReference { index });
        }
        if value.chars().count() > IMAGE_URL_MAX {
            return Err(ComplaintValidationError::ImageReferenceTooLong {
                index,
                max: IMAGE_URL_MAX,
            });
        }
        if !is_valid_image_reference(value) {
            return Err(ComplaintValidationError::MalformedImageReference { index });
        }
    }
    Ok(())
}

fn is_valid_image_reference(value: &str) -> bool {
    if let Some(rest) = value.strip_prefix('/') {
        return !rest.chars().any(char::is_whitespace);
    }
    Url::parse(value).is_ok()
}

/// Complaint lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    /// Stable wire form of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ComplaintStatus {
    type Error = ComplaintValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ComplaintValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// A persisted complaint as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Complaint {
    pub id: ComplaintId,
    pub title: ComplaintTitle,
    pub description: ComplaintDescription,
    pub location: Location,
    pub image_urls: Vec<String>,
    pub status: ComplaintStatus,
    pub vote_count: i64,
    pub submitted_by: AccountId,
    pub assigned_to: Option<AccountId>,
    pub created_at: DateTime<Utc>,
}

/// A validated submission ready to be persisted.
///
/// New complaints always start [`ComplaintStatus::Pending`] with a zero vote
/// count; neither is caller-controlled, so neither appears here.
/// `created_at` comes from the caller's injected clock.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub id: ComplaintId,
    pub title: ComplaintTitle,
    pub description: ComplaintDescription,
    pub location: Location,
    pub image_urls: Vec<String>,
    pub submitted_by: AccountId,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Pothole on Mill Road")]
    #[case("abc")]
    fn title_accepts_valid_input(#[case] raw: &str) {
        assert!(ComplaintTitle::new(raw).is_ok());
    }

    #[rstest]
    #[case("", ComplaintValidationError::EmptyTitle)]
    #[case("  ", ComplaintValidationError::EmptyTitle)]
    #[case("ab", ComplaintValidationError::TitleTooShort { min: TITLE_MIN })]
    fn title_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: ComplaintValidationError,
    ) {
        assert_eq!(ComplaintTitle::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn title_trims_before_measuring() {
        let title = ComplaintTitle::new("   Pothole   ").expect("valid title");
        assert_eq!(title.as_str(), "Pothole");
    }

    #[test]
    fn title_rejects_overlong_input() {
        let raw = "a".repeat(TITLE_MAX + 1);
        assert_eq!(
            ComplaintTitle::new(raw).expect_err("must fail"),
            ComplaintValidationError::TitleTooLong { max: TITLE_MAX }
        );
    }

    #[rstest]
    #[case("short", ComplaintValidationError::DescriptionTooShort { min: DESCRIPTION_MIN })]
    #[case("", ComplaintValidationError::DescriptionTooShort { min: DESCRIPTION_MIN })]
    fn description_rejects_short_input(
        #[case] raw: &str,
        #[case] expected: ComplaintValidationError,
    ) {
        assert_eq!(
            ComplaintDescription::new(raw).expect_err("must fail"),
            expected
        );
    }

    #[test]
    fn description_rejects_overlong_input() {
        let raw = "a".repeat(DESCRIPTION_MAX + 1);
        assert_eq!(
            ComplaintDescription::new(raw).expect_err("must fail"),
            ComplaintValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX
            }
        );
    }

    #[test]
    fn location_accepts_wgs84_bounds() {
        assert!(Location::new("12 Mill Road", 51.5, -0.12).is_ok());
        assert!(Location::new("South Pole", -90.0, 180.0).is_ok());
    }

    #[rstest]
    #[case(90.5, -0.12)]
    #[case(-90.5, -0.12)]
    #[case(f64::NAN, -0.12)]
    fn location_rejects_bad_latitude(#[case] latitude: f64, #[case] longitude: f64) {
        assert!(matches!(
            Location::new("12 Mill Road", latitude, longitude),
            Err(ComplaintValidationError::LatitudeOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(51.5, 180.5)]
    #[case(51.5, -180.5)]
    fn location_rejects_bad_longitude(#[case] latitude: f64, #[case] longitude: f64) {
        assert!(matches!(
            Location::new("12 Mill Road", latitude, longitude),
            Err(ComplaintValidationError::LongitudeOutOfRange { .. })
        ));
    }

    #[test]
    fn location_rejects_blank_or_overlong_line() {
        assert_eq!(
            Location::new("  ", 0.0, 0.0).expect_err("must fail"),
            ComplaintValidationError::EmptyLocationLine
        );
        let line = "a".repeat(LOCATION_LINE_MAX + 1);
        assert_eq!(
            Location::new(line, 0.0, 0.0).expect_err("must fail"),
            ComplaintValidationError::LocationLineTooLong {
                max: LOCATION_LINE_MAX
            }
        );
    }

    #[rstest]
    #[case(vec!["https://images.example.org/a.jpg".to_owned()])]
    #[case(vec!["/uploads/2026/pothole.jpg".to_owned()])]
    #[case(vec![])]
    fn image_urls_accept_absolute_and_rooted_references(#[case] urls: Vec<String>) {
        assert!(validate_image_urls(&urls).is_ok());
    }

    #[test]
    fn image_urls_reject_more_than_the_cap() {
        let urls = vec!["/uploads/a.jpg".to_owned(); IMAGE_URLS_MAX + 1];
        assert_eq!(
            validate_image_urls(&urls).expect_err("must fail"),
            ComplaintValidationError::TooManyImages {
                max: IMAGE_URLS_MAX
            }
        );
    }

    #[rstest]
    #[case("", ComplaintValidationError::EmptyImageReference { index: 1 })]
    #[case("relative/path.jpg", ComplaintValidationError::MalformedImageReference { index: 1 })]
    #[case("/has space.jpg", ComplaintValidationError::MalformedImageReference { index: 1 })]
    fn image_urls_reject_bad_entries(
        #[case] bad: &str,
        #[case] expected: ComplaintValidationError,
    ) {
        let urls = vec!["/uploads/ok.jpg".to_owned(), bad.to_owned()];
        assert_eq!(validate_image_urls(&urls).expect_err("must fail"), expected);
    }

    #[test]
    fn image_urls_reject_overlong_entries() {
        let urls = vec![format!("/{}", "a".repeat(IMAGE_URL_MAX))];
        assert_eq!(
            validate_image_urls(&urls).expect_err("must fail"),
            ComplaintValidationError::ImageReferenceTooLong {
                index: 0,
                max: IMAGE_URL_MAX
            }
        );
    }

    #[rstest]
    #[case("pending", ComplaintStatus::Pending)]
    #[case("in-progress", ComplaintStatus::InProgress)]
    #[case("resolved", ComplaintStatus::Resolved)]
    #[case("rejected", ComplaintStatus::Rejected)]
    fn status_parses_wire_values(#[case] raw: &str, #[case] expected: ComplaintStatus) {
        assert_eq!(ComplaintStatus::try_from(raw).expect("known status"), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert_eq!(
            ComplaintStatus::try_from("escalated").expect_err("must fail"),
            ComplaintValidationError::UnknownStatus {
                value: "escalated".to_owned()
            }
        );
    }

    #[test]
    fn status_serialises_kebab_case() {
        let value = serde_json::to_value(ComplaintStatus::InProgress).expect("serialises");
        assert_eq!(value, serde_json::Value::String("in-progress".to_owned()));
    }
}
