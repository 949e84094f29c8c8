//! Matching of rule identifiers against finding identifiers
//!
//! A rule identifier matches a finding when it is the full wildcard or the
//! exact same identifier. Prefix matching is not supported.

use super::is_full_wildcard;

/// Check whether a rule identifier suppresses a finding identifier
pub fn matches_id(rule_id: &str, finding_id: &str) -> bool {
    let rule_id = rule_id.trim();
    let finding_id = finding_id.trim();

    if rule_id.is_empty() || finding_id.is_empty() {
        return false;
    }

    if is_full_wildcard(rule_id) {
        return true;
    }

    rule_id == finding_id
}
