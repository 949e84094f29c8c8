//! Resource pattern and resource type checks

use crate::result::{FieldFlags, ValidationError, ValidationResult};
use crate::rules::{has_wildcard, is_blank};

/// Validate a resource pattern against the already-classified identifier
///
/// `identifier_is_full_wildcard` must come from the identifier check. A rule
/// suppressing every vulnerability may only target an exact resource.
pub fn validate_resource_pattern(
    pattern: &str,
    identifier_is_full_wildcard: bool,
) -> ValidationResult {
    if is_blank(pattern) {
        return ValidationResult::valid_with(FieldFlags::empty());
    }

    let wildcard = has_wildcard(pattern);

    if identifier_is_full_wildcard && wildcard {
        return ValidationResult::invalid(ValidationError::WildcardConflict);
    }

    ValidationResult::valid_with(FieldFlags::wildcard(wildcard))
}

/// Validate a resource type, which must be an exact name
pub fn validate_resource_type(resource_type: &str) -> ValidationResult {
    if is_blank(resource_type) {
        return ValidationResult::valid_with(FieldFlags::empty());
    }

    if has_wildcard(resource_type) {
        return ValidationResult::invalid(ValidationError::WildcardInResourceType);
    }

    ValidationResult::valid()
}

/// Require at least one of resource pattern and resource type
pub fn validate_resource_fields(pattern: &str, resource_type: &str) -> ValidationResult {
    if is_blank(pattern) && is_blank(resource_type) {
        return ValidationResult::invalid(ValidationError::NoResourceFieldProvided);
    }

    ValidationResult::valid()
}
