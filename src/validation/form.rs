//! Whole-form validation for Inspector rules

use crate::model::InspectorForm;
use crate::result::{FormField, FormValidationResult, ValidationResult};

use super::identifier::validate_identifier;
use super::resource::{validate_resource_fields, validate_resource_pattern, validate_resource_type};

/// Validate every field of the form and report all failures together
pub fn validate_inspector_form(form: &InspectorForm) -> FormValidationResult {
    validate_form_with(form, validate_identifier)
}

/// Run the form checks using the given identifier validator
///
/// The identifier is always checked first; its full-wildcard flag feeds the
/// resource pattern check.
pub(crate) fn validate_form_with(
    form: &InspectorForm,
    identifier_check: impl Fn(&str) -> ValidationResult,
) -> FormValidationResult {
    let mut result = FormValidationResult::default();

    let id_result = identifier_check(form.id());
    result.record(FormField::Id, &id_result);

    let pattern_result =
        validate_resource_pattern(form.resource_pattern(), id_result.is_full_wildcard());
    result.record(FormField::ResourcePattern, &pattern_result);

    result.record(
        FormField::ResourceType,
        &validate_resource_type(form.resource_type()),
    );

    result.record(
        FormField::ResourceFields,
        &validate_resource_fields(form.resource_pattern(), form.resource_type()),
    );

    result
}
