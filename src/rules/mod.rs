//! Identifier shape rules for suppression rules
//!
//! Defines the accepted vulnerability identifier formats and how rule
//! identifiers are matched against finding identifiers.

pub mod identifier;
pub mod matching;

/// The match-all marker used in identifiers and resource patterns
pub const WILDCARD: &str = "*";

/// An identifier shape definition
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Regex pattern the trimmed identifier must match
    pub pattern: &'static str,
}

impl Rule {
    /// Create a new rule
    pub const fn new(id: &'static str, pattern: &'static str) -> Self {
        Self { id, pattern }
    }
}

/// Check whether a value is empty once surrounding whitespace is removed
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check if a value contains the wildcard token anywhere
pub fn has_wildcard(value: &str) -> bool {
    value.contains(WILDCARD)
}

/// Check if an identifier is the full wildcard (`*` after trimming)
pub fn is_full_wildcard(id: &str) -> bool {
    id.trim() == WILDCARD
}
