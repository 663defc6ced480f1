//! Deterministic account and complaint generation from seed definitions.
//!
//! This module provides the generation functions that produce reproducible
//! demo data from a seed registry. The same seed value always produces
//! identical output. Accounts and complaints draw from independent RNG
//! streams derived from the same seed, so the complaints task can resolve
//! submitter identities by regenerating only the account stream.

use fake::Fake;
use fake::faker::lorem::raw::Sentence;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::registry::{SeedDefinition, SeedRegistry};
use crate::seed::{AccountSeed, ComplaintSeed};
use crate::validation::{
    DISPLAY_NAME_MAX, email_local_part, is_valid_display_name, sanitize_display_name,
};

/// Maximum number of attempts to generate a valid display name.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Offset deriving the complaint stream seed from the base seed value.
const COMPLAINT_STREAM_OFFSET: u64 = 0x636f_6d70_6c61_696e;

/// Complaint categories combined with streets to build titles.
const CATEGORIES: [&str; 8] = [
    "Pothole",
    "Streetlight outage",
    "Fly-tipping",
    "Graffiti",
    "Blocked drain",
    "Broken bench",
    "Missed bin collection",
    "Damaged signage",
];

/// Probability numerator for an account having a phone number (4 in 5).
const PHONE_PROBABILITY_NUMERATOR: u32 = 4;

/// Probability denominator for an account having a phone number.
const PHONE_PROBABILITY_DENOMINATOR: u32 = 5;

/// Smallest nine digit national number used for generated phones.
const PHONE_NATIONAL_MIN: u32 = 100_000_000;

/// Largest nine digit national number used for generated phones.
const PHONE_NATIONAL_MAX: u32 = 999_999_999;

/// Town centre latitude in microdegrees (51.5 degrees north).
const CENTRE_LATITUDE_MICRODEG: i32 = 51_500_000;

/// Town centre longitude in microdegrees (0.12 degrees west).
const CENTRE_LONGITUDE_MICRODEG: i32 = -120_000;

/// Maximum jitter applied around the town centre, in microdegrees.
const COORDINATE_JITTER_MICRODEG: i32 = 25_000;

/// Largest house number used for street address lines.
const HOUSE_NUMBER_MAX: u32 = 199;

/// Largest vote count the votes task applies to a single complaint.
const MAX_SEED_VOTES: u32 = 50;

/// Oldest notional submission age for a generated complaint, in hours.
const MAX_AGE_HOURS: u32 = 720;

/// Generates demo accounts from a seed definition.
///
/// Uses the seed's `seed` value to initialise a deterministic RNG, ensuring
/// identical output for the same seed definition. The generated accounts
/// have:
///
/// - Unique UUIDs (deterministically generated)
/// - Valid display names matching backend constraints
/// - Unique email addresses derived from the display name and index
/// - A phone number for roughly four accounts in five
///
/// # Errors
///
/// Returns [`GenerationError`] if display name generation fails after the
/// maximum number of retries.
///
/// # Example
///
/// ```
/// use seed_data::{SeedRegistry, generate_demo_accounts};
///
/// let json = r#"{
///     "version": 1,
///     "tasks": ["accounts"],
///     "streets": ["Mill Lane"],
///     "seeds": [{"name": "test", "seed": 42, "accountCount": 3, "complaintCount": 0}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid");
/// let seed_def = registry.find_seed("test").expect("found");
/// let accounts = generate_demo_accounts(seed_def).expect("generated");
///
/// assert_eq!(accounts.len(), 3);
/// // Same seed produces identical accounts
/// let accounts2 = generate_demo_accounts(seed_def).expect("generated");
/// assert_eq!(accounts, accounts2);
/// ```
pub fn generate_demo_accounts(
    seed_def: &SeedDefinition,
) -> Result<Vec<AccountSeed>, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());
    let mut accounts = Vec::with_capacity(seed_def.account_count());

    for index in 0..seed_def.account_count() {
        let account = generate_single_account(&mut rng, index)?;
        accounts.push(account);
    }

    Ok(accounts)
}

/// Generates demo complaints from a seed definition.
///
/// Complaints are placed on streets drawn from the registry pool and
/// attributed to accounts by index into the account stream of the same seed
/// definition. The complaint stream is seeded independently of the account
/// stream, so regenerating one never disturbs the other.
///
/// # Errors
///
/// Returns [`GenerationError`] if:
/// - The registry has no streets to place complaints on
/// - The seed definition generates no accounts to attribute complaints to
pub fn generate_demo_complaints(
    registry: &SeedRegistry,
    seed_def: &SeedDefinition,
) -> Result<Vec<ComplaintSeed>, GenerationError> {
    if registry.streets().is_empty() {
        return Err(GenerationError::NoStreets);
    }
    if seed_def.account_count() == 0 {
        return Err(GenerationError::NoSubmitters);
    }

    let mut rng =
        ChaCha8Rng::seed_from_u64(seed_def.seed().wrapping_add(COMPLAINT_STREAM_OFFSET));
    let mut complaints = Vec::with_capacity(seed_def.complaint_count());

    for _ in 0..seed_def.complaint_count() {
        let complaint =
            generate_single_complaint(&mut rng, registry.streets(), seed_def.account_count())?;
        complaints.push(complaint);
    }

    Ok(complaints)
}

/// Generates a single account with the provided RNG.
fn generate_single_account(
    rng: &mut ChaCha8Rng,
    index: usize,
) -> Result<AccountSeed, GenerationError> {
    // Generate deterministic UUID from RNG
    let id = Uuid::from_u128(rng.random());

    // Generate valid display name
    let display_name = generate_display_name(rng)?;

    // The index suffix keeps emails unique even for colliding names
    let email = format!("{}.{index}@demo.curbside.test", email_local_part(&display_name));

    let phone = rng
        .random_ratio(PHONE_PROBABILITY_NUMERATOR, PHONE_PROBABILITY_DENOMINATOR)
        .then(|| {
            format!(
                "+44{}",
                rng.random_range(PHONE_NATIONAL_MIN..=PHONE_NATIONAL_MAX)
            )
        });

    Ok(AccountSeed {
        id,
        email,
        display_name,
        phone,
    })
}

/// Generates a single complaint with the provided RNG.
fn generate_single_complaint(
    rng: &mut ChaCha8Rng,
    streets: &[String],
    submitter_count: usize,
) -> Result<ComplaintSeed, GenerationError> {
    let id = Uuid::from_u128(rng.random());

    let category = CATEGORIES.choose(rng).copied().unwrap_or("Pothole");
    let Some(street) = streets.choose(rng).map(String::as_str) else {
        return Err(GenerationError::NoStreets);
    };

    let title = format!("{category} on {street}");
    let street_line = format!("{} {street}", rng.random_range(1..=HOUSE_NUMBER_MAX));

    let flavour: String = Sentence(EN, 8..16).fake_with_rng(rng);
    let description = format!("{category} reported near {street_line}. {flavour}");

    let latitude_microdeg = CENTRE_LATITUDE_MICRODEG
        + rng.random_range(-COORDINATE_JITTER_MICRODEG..=COORDINATE_JITTER_MICRODEG);
    let longitude_microdeg = CENTRE_LONGITUDE_MICRODEG
        + rng.random_range(-COORDINATE_JITTER_MICRODEG..=COORDINATE_JITTER_MICRODEG);

    Ok(ComplaintSeed {
        id,
        title,
        description,
        street_line,
        latitude_microdeg,
        longitude_microdeg,
        submitter_index: rng.random_range(0..submitter_count),
        votes: rng.random_range(0..=MAX_SEED_VOTES),
        age_hours: rng.random_range(0..=MAX_AGE_HOURS),
    })
}

/// Generates a valid display name using the provided RNG.
///
/// Retries up to `MAX_NAME_ATTEMPTS` times if the generated name fails
/// validation. Names are constructed as first name followed by last name,
/// sanitized to remove invalid characters, and truncated if they exceed
/// the maximum length.
fn generate_display_name(rng: &mut ChaCha8Rng) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);

        // Combine with space
        let candidate = format!("{first} {last}");

        // Sanitize invalid characters
        let sanitized = sanitize_display_name(&candidate);

        // Truncate if too long (preserving whole characters)
        let truncated: String = sanitized.chars().take(DISPLAY_NAME_MAX).collect();

        if is_valid_display_name(&truncated) {
            return Ok(truncated);
        }
    }

    Err(GenerationError::DisplayNameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}
