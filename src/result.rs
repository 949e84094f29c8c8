//! Validation results for suppression rule fields
//!
//! Produces the structured results returned to form handlers, along with the
//! JSON shape they are serialized to.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reason a field value was rejected
///
/// The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Vulnerability ID is required")]
    MissingIdentifier,

    #[error("Invalid format. Use CVE-YYYY-NNNNN, CWE-NNN, or \"*\"")]
    InvalidIdentifierFormat,

    #[error("When ID is \"*\", Resource Pattern must be exact ARN (no wildcards)")]
    WildcardConflict,

    #[error("Wildcards not allowed in Resource Type")]
    WildcardInResourceType,

    #[error("Provide at least one: Resource Pattern or Resource Type")]
    NoResourceFieldProvided,

    #[error("ID contains invalid characters. Only alphanumeric, hyphens, commas, and asterisk are allowed.")]
    InvalidIdentifierCharacters,

    #[error("Partial wildcards (CVE-*, CWE-*) not allowed in ID. Use exact CVE/CWE or * only.")]
    PartialWildcard,

    #[error("Invalid CVE format: {0}. Use CVE-YYYY-NNNNN")]
    InvalidCveFormat(String),

    #[error("Invalid CWE format: {0}. Use CWE-NNN")]
    InvalidCweFormat(String),
}

impl ValidationError {
    /// Stable identifier for this failure, used in audit entries
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingIdentifier => "missing-identifier",
            ValidationError::InvalidIdentifierFormat => "invalid-identifier-format",
            ValidationError::WildcardConflict => "wildcard-conflict",
            ValidationError::WildcardInResourceType => "wildcard-in-resource-type",
            ValidationError::NoResourceFieldProvided => "no-resource-field",
            ValidationError::InvalidIdentifierCharacters => "invalid-identifier-chars",
            ValidationError::PartialWildcard => "partial-wildcard",
            ValidationError::InvalidCveFormat(_) => "invalid-cve-format",
            ValidationError::InvalidCweFormat(_) => "invalid-cwe-format",
        }
    }
}

/// Flags reported alongside a successful field check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_full_wildcard: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_wildcard: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
}

impl FieldFlags {
    pub fn full_wildcard(value: bool) -> Self {
        Self {
            is_full_wildcard: Some(value),
            ..Self::default()
        }
    }

    pub fn wildcard(value: bool) -> Self {
        Self {
            has_wildcard: Some(value),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self {
            is_empty: Some(true),
            ..Self::default()
        }
    }
}

/// Outcome of a single field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The value is acceptable
    Valid(FieldFlags),

    /// The value is rejected
    Invalid(ValidationError),
}

impl ValidationResult {
    /// Create a valid result with no flags
    pub fn valid() -> Self {
        ValidationResult::Valid(FieldFlags::default())
    }

    /// Create a valid result carrying flags
    pub fn valid_with(flags: FieldFlags) -> Self {
        ValidationResult::Valid(flags)
    }

    /// Create an invalid result
    pub fn invalid(error: ValidationError) -> Self {
        ValidationResult::Invalid(error)
    }

    /// Check if this is a valid result
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    /// Get the error if the value was rejected
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(error) => Some(error),
        }
    }

    /// Get the user-facing message if the value was rejected
    pub fn message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// Flags of a valid result; invalid results carry none
    pub fn flags(&self) -> FieldFlags {
        match self {
            ValidationResult::Valid(flags) => *flags,
            ValidationResult::Invalid(_) => FieldFlags::default(),
        }
    }

    pub fn is_full_wildcard(&self) -> bool {
        self.flags().is_full_wildcard.unwrap_or(false)
    }

    pub fn has_wildcard(&self) -> bool {
        self.flags().has_wildcard.unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.flags().is_empty.unwrap_or(false)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Serialize)]
struct ResultOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(flatten)]
    flags: FieldFlags,
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ResultOutput {
            valid: self.is_valid(),
            message: self.message(),
            flags: self.flags(),
        }
        .serialize(serializer)
    }
}

/// Form field an error is reported against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Id,
    ResourcePattern,
    ResourceType,
    /// The resource pattern / resource type pair
    ResourceFields,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Id,
        FormField::ResourcePattern,
        FormField::ResourceType,
        FormField::ResourceFields,
    ];

    /// Key used for this field in error maps
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Id => "id",
            FormField::ResourcePattern => "resourcePattern",
            FormField::ResourceType => "resourceType",
            FormField::ResourceFields => "resourceFields",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(FormField::Id),
            "resourcePattern" | "resource_pattern" => Ok(FormField::ResourcePattern),
            "resourceType" | "resource_type" => Ok(FormField::ResourceType),
            "resourceFields" | "resource_fields" => Ok(FormField::ResourceFields),
            other => Err(format!("unknown field: {}", other)),
        }
    }
}

/// Outcome of validating a whole form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidationResult {
    errors: BTreeMap<FormField, ValidationError>,
}

impl FormValidationResult {
    /// Record the outcome of one check, keeping only failures
    pub fn record(&mut self, field: FormField, result: &ValidationResult) {
        if let Some(error) = result.error() {
            self.errors.insert(field, error.clone());
        }
    }

    /// True iff no check failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the error reported for a field
    pub fn error(&self, field: FormField) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    /// All failures, in field order
    pub fn errors(&self) -> impl Iterator<Item = (FormField, &ValidationError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    /// Fields that failed, in field order
    pub fn failed_fields(&self) -> Vec<FormField> {
        self.errors.keys().copied().collect()
    }

    /// Message of the first failing field
    pub fn first_message(&self) -> Option<String> {
        self.errors.values().next().map(ToString::to_string)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl fmt::Display for FormValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .errors
            .iter()
            .map(|(field, error)| format!("{}: {}", field, error))
            .collect();
        f.write_str(&messages.join("; "))
    }
}

#[derive(Serialize)]
struct FormOutput {
    valid: bool,
    errors: BTreeMap<&'static str, String>,
}

impl Serialize for FormValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FormOutput {
            valid: self.is_valid(),
            errors: self
                .errors
                .iter()
                .map(|(field, error)| (field.as_str(), error.to_string()))
                .collect(),
        }
        .serialize(serializer)
    }
}
