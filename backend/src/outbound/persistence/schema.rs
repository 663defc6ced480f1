//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation. When
//! a migration changes the schema, update this file to match (or regenerate
//! it with `diesel print-schema` against a migrated database).

diesel::table! {
    /// Registered accounts: citizens, staff, and administrators.
    ///
    /// The `id` column is the primary key (UUID v4) and `email` carries a
    /// unique constraint named `accounts_email_key`.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised (trimmed, lowercased) email address; unique.
        email -> Varchar,
        /// Human-readable display name.
        display_name -> Varchar,
        /// Optional contact phone, digits with an optional leading `+`.
        phone -> Nullable<Varchar>,
        /// Bcrypt hash of the account password.
        password_hash -> Varchar,
        /// Account role: `staff`, `admin`, or `superadmin`.
        role -> Varchar,
        /// Grants the complaint-assignment operation.
        can_assign -> Bool,
        /// Grants the status-update operation.
        can_resolve -> Bool,
        /// Grants the complaint-deletion operation.
        can_delete -> Bool,
        /// Forces a password rotation at next login.
        must_change_password -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Citizen complaints with lifecycle state and vote tally.
    ///
    /// `submitted_by` and `assigned_to` both reference `accounts (id)`.
    complaints (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Short complaint title.
        title -> Varchar,
        /// Full complaint description.
        description -> Text,
        /// Free-text address line for the complaint site.
        location_line -> Varchar,
        /// WGS84 latitude of the complaint site.
        latitude -> Float8,
        /// WGS84 longitude of the complaint site.
        longitude -> Float8,
        /// Image references: absolute URLs or `/`-rooted paths.
        image_urls -> Array<Text>,
        /// Lifecycle status: `pending`, `in-progress`, `resolved`, `rejected`.
        status -> Varchar,
        /// Running tally of citizen votes.
        vote_count -> Int8,
        /// Account that submitted the complaint.
        submitted_by -> Uuid,
        /// Staff account the complaint is assigned to, if any.
        assigned_to -> Nullable<Uuid>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(accounts, complaints);
