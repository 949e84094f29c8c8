//! Validation engine for Inspector suppression rules
//!
//! The free functions are pure and may be called per keystroke. The
//! [`ValidationEngine`] bundles them with the configured strictness and the
//! set of products whose rules need Inspector validation.

pub mod form;
pub mod identifier;
pub mod resource;

pub use form::validate_inspector_form;
use form::validate_form_with;
pub use identifier::{validate_identifier, validate_identifier_strict};
pub use resource::{validate_resource_fields, validate_resource_pattern, validate_resource_type};

use crate::config::{Config, Strictness};
use crate::model::{InspectorForm, SuppressionRule};
use crate::result::{FormField, FormValidationResult, ValidationResult};
use crate::rules::is_full_wildcard;

use std::env;

/// Environment variable forcing strict identifier validation
pub const STRICT_ENV_VAR: &str = "SUPPRESSION_RULES_STRICT";

/// Configured validation entry point
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    strictness: Strictness,
    inspector_products: Vec<String>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(Strictness::Standard)
    }
}

impl ValidationEngine {
    /// Create an engine validating Inspector rules at the given strictness
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            inspector_products: vec!["Inspector".to_string()],
        }
    }

    /// Create an engine from configuration and environment
    pub fn from_config(config: &Config) -> Self {
        let strictness = if env::var(STRICT_ENV_VAR).is_ok() {
            Strictness::Strict
        } else {
            config.validation.strictness
        };

        Self {
            strictness,
            inspector_products: config.validation.inspector_products.clone(),
        }
    }

    /// Check if rules for a product get Inspector validation
    pub fn is_inspector_product(&self, product_name: &str) -> bool {
        let name = product_name.trim();
        self.inspector_products
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(name))
    }

    /// Validate an identifier at the configured strictness
    pub fn check_identifier(&self, id: &str) -> ValidationResult {
        match self.strictness {
            Strictness::Standard => validate_identifier(id),
            Strictness::Strict => validate_identifier_strict(id),
        }
    }

    /// Validate a single field for live feedback
    ///
    /// The full-wildcard flag used by the resource pattern check is derived
    /// from the form's current identifier.
    pub fn check_field(&self, form: &InspectorForm, field: FormField) -> ValidationResult {
        match field {
            FormField::Id => self.check_identifier(form.id()),
            FormField::ResourcePattern => {
                validate_resource_pattern(form.resource_pattern(), is_full_wildcard(form.id()))
            }
            FormField::ResourceType => validate_resource_type(form.resource_type()),
            FormField::ResourceFields => {
                validate_resource_fields(form.resource_pattern(), form.resource_type())
            }
        }
    }

    /// Validate one field of a stored rule; rules for other products always pass
    pub fn check_rule_field(&self, rule: &SuppressionRule, field: FormField) -> ValidationResult {
        if !self.is_inspector_product(&rule.product_name) {
            return ValidationResult::valid();
        }

        self.check_field(&rule.inspector_form(), field)
    }

    /// Validate a whole form
    pub fn check_form(&self, form: &InspectorForm) -> FormValidationResult {
        validate_form_with(form, |id| self.check_identifier(id))
    }

    /// Validate a stored rule; rules for other products always pass
    pub fn check_rule(&self, rule: &SuppressionRule) -> FormValidationResult {
        if !self.is_inspector_product(&rule.product_name) {
            return FormValidationResult::default();
        }

        self.check_form(&rule.inspector_form())
    }
}
