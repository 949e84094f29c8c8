//! Integration tests for Inspector rule validation

use serde_json::json;
use suppression_rules::{
    is_full_wildcard, validate_identifier, validate_inspector_form, validate_resource_fields,
    validate_resource_pattern, validate_resource_type, FormField, InspectorForm, Strictness,
    ValidationEngine, ValidationError, ValidationInput,
};

fn check_form(json: &str) -> serde_json::Value {
    let form = InspectorForm::from_json(json).unwrap();
    serde_json::to_value(validate_inspector_form(&form)).unwrap()
}

// ============================================================================
// Identifier
// ============================================================================

#[test]
fn test_blank_identifier_required() {
    for id in ["", " ", "\t", "\n  \n"] {
        let result = validate_identifier(id);
        assert!(!result.is_valid());
        assert_eq!(result.error(), Some(&ValidationError::MissingIdentifier));
    }
}

#[test]
fn test_wildcard_identifier() {
    for id in ["*", "  *  ", "\t*\n"] {
        let result = validate_identifier(id);
        assert!(result.is_valid());
        assert!(result.is_full_wildcard());
    }
}

#[test]
fn test_cve_identifiers() {
    for id in ["CVE-2025-66418", "CVE-1999-0001", "CVE-2023-1234567"] {
        let result = validate_identifier(id);
        assert!(result.is_valid(), "{}", id);
        assert!(!result.is_full_wildcard());
    }

    for id in ["CVE-25-1", "CVE-2025-1", "CVE-2025-12345678", "CVE-2025", "cve-2025-66418"] {
        assert!(!validate_identifier(id).is_valid(), "{}", id);
    }
}

#[test]
fn test_cwe_identifiers() {
    for id in ["CWE-409", "CWE-117,93", "CWE-1,22,333,4444"] {
        assert!(validate_identifier(id).is_valid(), "{}", id);
    }

    for id in ["CWE-", "CWE-12345", "CWE-117,", "CWE-117,,93", "CWE-117 ,93"] {
        assert!(!validate_identifier(id).is_valid(), "{}", id);
    }
}

#[test]
fn test_full_wildcard_consistency() {
    let samples = [
        "", "*", " * ", "**", "*a", "a*", "CVE-*", "CWE-409", "\u{a0}*", "* ", "\r\n*\r\n",
    ];
    for id in samples {
        assert_eq!(validate_identifier(id).is_full_wildcard(), is_full_wildcard(id), "{:?}", id);
    }
}

// ============================================================================
// Resource fields
// ============================================================================

#[test]
fn test_resource_pattern_examples() {
    assert!(!validate_resource_pattern("arn:aws:lambda:*:*:function:foo", true).is_valid());
    assert!(validate_resource_pattern("arn:aws:lambda:us-east-1:123:function:foo", true).is_valid());
    assert!(validate_resource_pattern("arn:aws:lambda:us-east-1:123:function:*", false).is_valid());
}

#[test]
fn test_resource_type_examples() {
    assert!(validate_resource_type("AwsLambdaFunction").is_valid());
    assert!(!validate_resource_type("Aws*Function").is_valid());
}

#[test]
fn test_resource_fields_examples() {
    assert!(!validate_resource_fields("", "").is_valid());
    assert!(validate_resource_fields("arn:x", "").is_valid());
    assert!(validate_resource_fields("", "AwsLambdaFunction").is_valid());
}

// ============================================================================
// Whole form
// ============================================================================

#[test]
fn test_form_valid_specific_identifier() {
    let value = check_form(
        r#"{"id":"CVE-2025-66418","resourcePattern":"arn:aws:lambda:*:*:function:sw-oasis-esf-*","resourceType":""}"#,
    );
    assert_eq!(value, json!({"valid": true, "errors": {}}));
}

#[test]
fn test_form_wildcard_conflict() {
    let value = check_form(r#"{"id":"*","resourcePattern":"arn:aws:lambda:*:*:function:foo","resourceType":""}"#);
    assert_eq!(value["valid"], json!(false));

    let errors = value["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors["resourcePattern"],
        json!("When ID is \"*\", Resource Pattern must be exact ARN (no wildcards)")
    );
}

#[test]
fn test_form_all_blank() {
    let value = check_form(r#"{"id":"","resourcePattern":"","resourceType":""}"#);
    assert_eq!(
        value,
        json!({
            "valid": false,
            "errors": {
                "id": "Vulnerability ID is required",
                "resourceFields": "Provide at least one: Resource Pattern or Resource Type"
            }
        })
    );
}

#[test]
fn test_form_missing_keys() {
    let value = check_form("{}");
    let errors = value["errors"].as_object().unwrap();
    assert!(errors.contains_key("id"));
    assert!(errors.contains_key("resourceFields"));
}

#[test]
fn test_form_accepts_rule_records() {
    let value = check_form(
        r#"{"id":"CWE-409","ser_id":"SER-2025-010","product_name":"Inspector","resource_pattern":"","resource_type":"AwsLambdaFunction"}"#,
    );
    assert_eq!(value["valid"], json!(true));
}

#[test]
fn test_form_reports_every_failure() {
    let form = InspectorForm::new("CWE-", "arn:*", "Aws*");
    let result = validate_inspector_form(&form);
    assert_eq!(
        result.failed_fields(),
        vec![FormField::Id, FormField::ResourceType]
    );
    assert_eq!(
        result.first_message().as_deref(),
        Some("Invalid format. Use CVE-YYYY-NNNNN, CWE-NNN, or \"*\"")
    );
}

// ============================================================================
// Rule records
// ============================================================================

fn check_input(json: &str) -> serde_json::Value {
    let engine = ValidationEngine::default();
    let result = match ValidationInput::from_json(json).unwrap() {
        ValidationInput::Form(form) => engine.check_form(&form),
        ValidationInput::Rule(rule) => engine.check_rule(&rule),
    };
    serde_json::to_value(result).unwrap()
}

#[test]
fn test_security_hub_record_not_checked_as_inspector() {
    let value = check_input(
        r#"{"id":"ELB.6","ser_id":"S1","product_name":"Security Hub","resource_type":"Aws"}"#,
    );
    assert_eq!(value, json!({"valid": true, "errors": {}}));
}

#[test]
fn test_inspector_record_checked() {
    let value = check_input(
        r#"{"id":"*","ser_id":"S1","product_name":"Inspector","resource_pattern":"arn:aws:s3:::bucket-*"}"#,
    );
    assert_eq!(value["valid"], false);
    assert_eq!(
        value["errors"]["resourcePattern"],
        "When ID is \"*\", Resource Pattern must be exact ARN (no wildcards)"
    );
}

#[test]
fn test_form_with_both_key_spellings() {
    let value = check_form(
        r#"{"id":"*","resourcePattern":"arn:aws:s3:::bucket","resource_pattern":"arn:aws:s3:::bucket-*"}"#,
    );
    assert_eq!(value, json!({"valid": true, "errors": {}}));
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn test_strict_engine_rejects_partial_wildcards() {
    let engine = ValidationEngine::new(Strictness::Strict);
    for id in ["CVE-*", "CWE-*", "CVE-2025-*", "*-12345", "C*E-2025-12345"] {
        let result = engine.check_form(&InspectorForm::new(id, "arn:aws:*", ""));
        assert_eq!(result.error(FormField::Id), Some(&ValidationError::PartialWildcard), "{}", id);
    }
}

#[test]
fn test_strict_engine_full_rules() {
    let engine = ValidationEngine::new(Strictness::Strict);

    let valid = [
        InspectorForm::new("CVE-2025-12345", "arn:aws:ec2:*", ""),
        InspectorForm::new("CVE-2025-12345", "", "AWS::EC2::Instance"),
        InspectorForm::new("*", "arn:aws:ec2:us-east-1:123456789012:instance/i-abc", ""),
        InspectorForm::new("CWE-409", "*", "AWS::EC2::Instance"),
    ];
    for form in &valid {
        assert!(engine.check_form(form).is_valid(), "{:?}", form);
    }

    let invalid = [
        InspectorForm::new("CVE-*", "arn:aws:*", ""),
        InspectorForm::new("*", "*", ""),
        InspectorForm::new("CVE-2025-12345", "", "*"),
        InspectorForm::new("CVE-2025-12345", "", ""),
        InspectorForm::new("", "arn:aws:*", ""),
    ];
    for form in &invalid {
        assert!(!engine.check_form(form).is_valid(), "{:?}", form);
    }
}
