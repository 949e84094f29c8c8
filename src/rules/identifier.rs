//! Vulnerability identifier formats
//!
//! CVE and CWE shapes accepted for Inspector suppression rules, plus the
//! character whitelist enforced in strict mode.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::Rule;

/// CVE identifier, e.g. CVE-2025-66418
pub const CVE_RULE: Rule = Rule::new("cve", r"^CVE-\d{4}-\d{4,7}$");

/// CWE identifier or comma-separated list, e.g. CWE-409 or CWE-117,93
pub const CWE_RULE: Rule = Rule::new("cwe", r"^CWE-\d{1,4}(,\d{1,4})*$");

/// All accepted identifier shapes, in evaluation order
pub const IDENTIFIER_SHAPES: &[Rule] = &[CVE_RULE, CWE_RULE];

/// Characters allowed in an identifier under strict validation
pub const INVALID_ID_CHARS: &str = r"[^a-zA-Z0-9\-*,]";

pub static CVE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(CVE_RULE.pattern).unwrap());

pub static CWE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(CWE_RULE.pattern).unwrap());

static INVALID_ID_CHARS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(INVALID_ID_CHARS).unwrap());

/// Which accepted shape an identifier has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierShape {
    FullWildcard,
    Cve,
    Cwe,
}

/// Classify a trimmed identifier, returning `None` when no shape matches
pub fn classify(trimmed: &str) -> Option<IdentifierShape> {
    if super::is_full_wildcard(trimmed) {
        Some(IdentifierShape::FullWildcard)
    } else if trimmed.starts_with("CVE-") && CVE_PATTERN.is_match(trimmed) {
        Some(IdentifierShape::Cve)
    } else if trimmed.starts_with("CWE-") && CWE_PATTERN.is_match(trimmed) {
        Some(IdentifierShape::Cwe)
    } else {
        None
    }
}

/// Check if an identifier contains characters outside the strict whitelist
pub fn has_invalid_chars(trimmed: &str) -> bool {
    INVALID_ID_CHARS_PATTERN.is_match(trimmed)
}
