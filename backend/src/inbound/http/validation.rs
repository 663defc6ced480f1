//! Field-violation collection for request payloads.
//!
//! Handlers validate every field of a payload before failing, so a response
//! names all the offending fields at once instead of the first one found.
//! The collector preserves the order fields were checked in, which fixes the
//! order of the `errors` list in the envelope.

use std::fmt;

use crate::domain::{ApiFailure, FieldViolation};

/// Accumulates [`FieldViolation`]s while a payload is checked field by field.
#[derive(Debug, Default)]
pub(crate) struct ViolationCollector {
    violations: Vec<FieldViolation>,
}

impl ViolationCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a violation against the named field.
    pub(crate) fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    /// Unwrap a constructor result, recording a violation on failure.
    pub(crate) fn check<T, E: fmt::Display>(
        &mut self,
        field: &str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(field, error.to_string());
                None
            }
        }
    }

    /// As [`Self::check`], but for optional fields: an absent value is fine.
    pub(crate) fn check_optional<T, E: fmt::Display>(
        &mut self,
        field: &str,
        result: Option<Result<T, E>>,
    ) -> Option<T> {
        result.and_then(|inner| self.check(field, inner))
    }

    /// Finish the pass: `Ok` when nothing was recorded, otherwise the
    /// collected violations as a single validation failure.
    pub(crate) fn finish(self) -> Result<(), ApiFailure> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ApiFailure::validation(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountValidationError, DisplayName, EmailAddress};

    #[test]
    fn empty_collector_finishes_clean() {
        let collector = ViolationCollector::new();
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn violations_keep_the_order_fields_were_checked_in() {
        let mut collector = ViolationCollector::new();
        assert!(
            collector
                .check("email", EmailAddress::new("broken"))
                .is_none()
        );
        collector.push("password", "password is required");
        assert!(collector.check("displayName", DisplayName::new("x")).is_none());

        let failure = collector.finish().expect_err("violations collected");
        let ApiFailure::Validation { violations } = failure else {
            panic!("expected a validation failure");
        };
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["email", "password", "displayName"]);
    }

    #[test]
    fn successful_checks_yield_the_value_and_no_violation() {
        let mut collector = ViolationCollector::new();
        let email = collector.check("email", EmailAddress::new("a@b.org"));
        assert!(email.is_some());
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn absent_optional_fields_are_not_violations() {
        let mut collector = ViolationCollector::new();
        let value =
            collector.check_optional::<EmailAddress, AccountValidationError>("phone", None);
        assert!(value.is_none());
        assert!(collector.finish().is_ok());
    }
}
