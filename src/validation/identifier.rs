//! Vulnerability identifier checks
//!
//! Classifies the identifier of an Inspector rule as the full wildcard, a CVE
//! or a CWE identifier.

use crate::result::{FieldFlags, ValidationError, ValidationResult};
use crate::rules::identifier::{self, IdentifierShape};
use crate::rules::{has_wildcard, is_blank};

/// Validate an identifier the way the rule form does
pub fn validate_identifier(id: &str) -> ValidationResult {
    if is_blank(id) {
        return ValidationResult::invalid(ValidationError::MissingIdentifier);
    }

    match identifier::classify(id.trim()) {
        Some(shape) => accepted(shape),
        None => ValidationResult::invalid(ValidationError::InvalidIdentifierFormat),
    }
}

/// Validate an identifier with the stricter rules applied before rules are stored
///
/// Rejects unexpected characters and partial wildcards with dedicated
/// messages, and names the expected CVE or CWE shape when the prefix is known.
pub fn validate_identifier_strict(id: &str) -> ValidationResult {
    if is_blank(id) {
        return ValidationResult::invalid(ValidationError::MissingIdentifier);
    }

    let trimmed = id.trim();

    if identifier::has_invalid_chars(trimmed) {
        return ValidationResult::invalid(ValidationError::InvalidIdentifierCharacters);
    }

    if has_wildcard(trimmed) && !crate::rules::is_full_wildcard(trimmed) {
        return ValidationResult::invalid(ValidationError::PartialWildcard);
    }

    if let Some(shape) = identifier::classify(trimmed) {
        return accepted(shape);
    }

    let upper = trimmed.to_uppercase();
    let error = if upper.starts_with("CVE") {
        ValidationError::InvalidCveFormat(trimmed.to_string())
    } else if upper.starts_with("CWE") {
        ValidationError::InvalidCweFormat(trimmed.to_string())
    } else {
        ValidationError::InvalidIdentifierFormat
    };

    ValidationResult::invalid(error)
}

fn accepted(shape: IdentifierShape) -> ValidationResult {
    ValidationResult::valid_with(FieldFlags::full_wildcard(
        shape == IdentifierShape::FullWildcard,
    ))
}
