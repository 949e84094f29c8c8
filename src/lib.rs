//! suppression-rules - Validation for security finding suppression rules
//!
//! This library validates the suppression rules that tell a findings pipeline
//! (Inspector, Security Hub) which findings to ignore, and keeps them in a
//! caller-owned, audited store.
//!
//! # Features
//!
//! - **Identifier checks**: CVE, CWE and full-wildcard identifiers
//! - **Resource checks**: wildcard rules for resource patterns and types
//! - **Form validation**: every failing field reported at once
//! - **Strict mode**: character and partial-wildcard checks on identifiers
//! - **Rule store**: in-memory create/list/update/delete with validation
//! - **Audit logging**: JSONL log of every change
//!
//! # Example
//!
//! ```
//! use suppression_rules::{validate_inspector_form, FormField, InspectorForm};
//!
//! let form = InspectorForm::new("*", "arn:aws:lambda:*:*:function:foo", "");
//! let result = validate_inspector_form(&form);
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.failed_fields(), vec![FormField::ResourcePattern]);
//! ```

pub mod audit;
pub mod config;
pub mod model;
pub mod result;
pub mod rules;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use config::{Config, Strictness};
pub use model::{InspectorForm, Product, SuppressionRule, UserProfile, ValidationInput};
pub use result::{FieldFlags, FormField, FormValidationResult, ValidationError, ValidationResult};
pub use rules::matching::matches_id;
pub use rules::{has_wildcard, is_full_wildcard, WILDCARD};
pub use store::{RuleStore, StoreError};
pub use validation::{
    validate_identifier, validate_inspector_form, validate_resource_fields,
    validate_resource_pattern, validate_resource_type, ValidationEngine,
};
