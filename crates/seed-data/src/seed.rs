//! Generated demo record types.
//!
//! This module defines the output types from demo data generation. These
//! types are independent of backend domain types to avoid circular
//! dependencies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated demo account record.
///
/// This type contains the fields needed to create an account in the backend.
/// It is designed to be converted into backend domain types at the point of
/// use; the backend supplies role, permissions, and the password hash.
///
/// # Example
///
/// ```
/// use seed_data::AccountSeed;
/// use uuid::Uuid;
///
/// let account = AccountSeed {
///     id: Uuid::new_v4(),
///     email: "ada.lovelace.0@demo.curbside.test".to_owned(),
///     display_name: "Ada Lovelace".to_owned(),
///     phone: None,
/// };
///
/// assert_eq!(account.display_name, "Ada Lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSeed {
    /// Unique identifier for the account.
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
}

/// A generated demo complaint record.
///
/// Complaints reference their submitter by index into the account stream
/// generated from the same seed definition, so the complaints task can
/// resolve submitters without persisted lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSeed {
    /// Unique identifier for the complaint.
    pub id: Uuid,
    /// Short headline, category plus street.
    pub title: String,
    /// Longer free-text description.
    pub description: String,
    /// Street address line.
    pub street_line: String,
    /// Latitude in microdegrees (degrees times one million).
    pub latitude_microdeg: i32,
    /// Longitude in microdegrees (degrees times one million).
    pub longitude_microdeg: i32,
    /// Index of the submitting account in the account stream.
    pub submitter_index: usize,
    /// Number of votes the votes task applies to this complaint.
    pub votes: u32,
    /// Hours before the seeding run the complaint was notionally submitted.
    pub age_hours: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_seed_serializes_to_camel_case() {
        let account = AccountSeed {
            id: Uuid::nil(),
            email: "test@demo.curbside.test".to_owned(),
            display_name: "Test".to_owned(),
            phone: Some("+441234567890".to_owned()),
        };
        let json = serde_json::to_string(&account).expect("serialize");
        assert!(json.contains("displayName"));
        assert!(json.contains("email"));
        assert!(json.contains("phone"));
    }

    #[test]
    fn complaint_seed_serializes_to_camel_case() {
        let complaint = ComplaintSeed {
            id: Uuid::nil(),
            title: "Pothole on Mill Lane".to_owned(),
            description: "Deep pothole near the junction.".to_owned(),
            street_line: "12 Mill Lane".to_owned(),
            latitude_microdeg: 51_500_000,
            longitude_microdeg: -120_000,
            submitter_index: 0,
            votes: 3,
            age_hours: 48,
        };
        let json = serde_json::to_string(&complaint).expect("serialize");
        assert!(json.contains("streetLine"));
        assert!(json.contains("latitudeMicrodeg"));
        assert!(json.contains("longitudeMicrodeg"));
        assert!(json.contains("submitterIndex"));
        assert!(json.contains("ageHours"));
    }
}
