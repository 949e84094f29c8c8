//! Suppression rule records and validation inputs
//!
//! Parses the JSON records exchanged with the rule administration UI.

use serde::{Deserialize, Serialize};

use crate::rules::matching::matches_id;

/// Finding type assigned to Inspector rules
pub const INSPECTOR_FINDING_TYPE: &str = "Vulnerabilities";

/// Finding type assigned to Security Hub rules
pub const SECURITY_HUB_FINDING_TYPE: &str = "Industry and Regulatory Standards";

/// Group granting write access to suppression rules
pub const ADMIN_GROUP: &str = "GS_AADMGMT_AWSCSCI_Admins";

/// Group granting read-only access to suppression rules
pub const READONLY_GROUP: &str = "GS_AADMGMT_AWSCSCI_Readonly_Users";

/// Raw field values of the Inspector rule form
///
/// Absent fields are treated as empty strings. Both the form's camelCase keys
/// and the rule record's snake_case keys are read; camelCase wins when a
/// record carries both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", from = "FormKeys")]
pub struct InspectorForm {
    pub id: Option<String>,
    pub resource_pattern: Option<String>,
    pub resource_type: Option<String>,
}

/// Every key spelling an Inspector form may arrive with
#[derive(Deserialize)]
struct FormKeys {
    #[serde(default)]
    id: Option<String>,

    #[serde(default, rename = "resourcePattern")]
    resource_pattern: Option<String>,

    #[serde(default, rename = "resource_pattern")]
    resource_pattern_snake: Option<String>,

    #[serde(default, rename = "resourceType")]
    resource_type: Option<String>,

    #[serde(default, rename = "resource_type")]
    resource_type_snake: Option<String>,
}

impl From<FormKeys> for InspectorForm {
    fn from(keys: FormKeys) -> Self {
        Self {
            id: keys.id,
            resource_pattern: keys.resource_pattern.or(keys.resource_pattern_snake),
            resource_type: keys.resource_type.or(keys.resource_type_snake),
        }
    }
}

impl InspectorForm {
    pub fn new(
        id: impl Into<String>,
        resource_pattern: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            resource_pattern: Some(resource_pattern.into()),
            resource_type: Some(resource_type.into()),
        }
    }

    /// Parse a form from JSON; rule records are accepted too
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn resource_pattern(&self) -> &str {
        self.resource_pattern.as_deref().unwrap_or("")
    }

    pub fn resource_type(&self) -> &str {
        self.resource_type.as_deref().unwrap_or("")
    }
}

/// Product a suppression rule applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Product {
    Inspector,
    SecurityHub,
    Other(String),
}

impl Product {
    /// Classify a product name, case-insensitively
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("Inspector") {
            Product::Inspector
        } else if trimmed.eq_ignore_ascii_case("Security Hub") {
            Product::SecurityHub
        } else {
            Product::Other(trimmed.to_string())
        }
    }

    /// Finding type implied by the product, if any
    pub fn finding_type(&self) -> Option<&'static str> {
        match self {
            Product::Inspector => Some(INSPECTOR_FINDING_TYPE),
            Product::SecurityHub => Some(SECURITY_HUB_FINDING_TYPE),
            Product::Other(_) => None,
        }
    }
}

/// A stored suppression rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SuppressionRule {
    /// Finding or vulnerability identifier (partition key)
    pub id: String,

    /// Security exception request identifier (sort key)
    pub ser_id: String,

    pub finding_title: String,

    #[serde(rename = "findingType")]
    pub finding_type: String,

    pub product_name: String,
    pub ser_link: String,
    pub due_date: String,
    pub description: String,
    pub account_exception: String,
    pub account_inclusion: String,
    pub from_severity: String,
    pub to_severity: String,
    pub resource_type: String,
    pub resource_pattern: String,
    pub extra_resource_pattern: String,
}

impl SuppressionRule {
    /// Parse a rule from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn product(&self) -> Product {
        Product::from_name(&self.product_name)
    }

    /// Project this rule onto the Inspector form fields
    pub fn inspector_form(&self) -> InspectorForm {
        InspectorForm::new(
            self.id.clone(),
            self.resource_pattern.clone(),
            self.resource_type.clone(),
        )
    }

    /// Set the finding type implied by the product name
    pub fn apply_finding_type(&mut self) {
        if let Some(finding_type) = self.product().finding_type() {
            self.finding_type = finding_type.to_string();
        }
    }

    /// Check whether this rule suppresses a finding with the given identifier
    pub fn matches_finding_id(&self, finding_id: &str) -> bool {
        matches_id(&self.id, finding_id)
    }

    /// Get a summary of the rule for logging
    pub fn summary(&self) -> String {
        format!("Id : {} | ser_id: {}", self.id, self.ser_id)
    }
}

/// Validator input: a bare rule form or a full rule record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationInput {
    Form(InspectorForm),
    Rule(SuppressionRule),
}

impl ValidationInput {
    /// Parse JSON input; objects naming a `product_name` are rule records
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        if value.get("product_name").is_some() {
            serde_json::from_value(value).map(ValidationInput::Rule)
        } else {
            serde_json::from_value(value).map(ValidationInput::Form)
        }
    }
}

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl UserProfile {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.groups.iter().any(|g| g == ADMIN_GROUP)
    }

    /// Group label shown in the navigation bar
    pub fn display_group(&self) -> Option<&'static str> {
        if self.is_admin() {
            Some("Admin")
        } else if self.groups.iter().any(|g| g == READONLY_GROUP) {
            Some("Readonly")
        } else {
            None
        }
    }

    /// Whether create, update and delete actions should be offered
    pub fn can_edit(&self) -> bool {
        self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_camel_case() {
        let json = r#"{"id":"CVE-2025-66418","resourcePattern":"arn:aws:lambda:*","resourceType":""}"#;
        let form = InspectorForm::from_json(json).unwrap();
        assert_eq!(form.id(), "CVE-2025-66418");
        assert_eq!(form.resource_pattern(), "arn:aws:lambda:*");
        assert_eq!(form.resource_type(), "");
    }

    #[test]
    fn test_parse_form_absent_and_null_fields() {
        let form = InspectorForm::from_json(r#"{"id":null}"#).unwrap();
        assert_eq!(form.id(), "");
        assert_eq!(form.resource_pattern(), "");
        assert_eq!(form.resource_type(), "");
    }

    #[test]
    fn test_parse_form_from_rule_record() {
        let json = r#"{"id":"CWE-409","ser_id":"SER-1","resource_pattern":"arn:x","resource_type":"AwsLambdaFunction"}"#;
        let form = InspectorForm::from_json(json).unwrap();
        assert_eq!(form.resource_pattern(), "arn:x");
        assert_eq!(form.resource_type(), "AwsLambdaFunction");
    }

    #[test]
    fn test_parse_form_prefers_camel_case_key() {
        let json = r#"{"id":"*","resourcePattern":"arn:exact","resource_pattern":"arn:*","resource_type":"AwsLambdaFunction"}"#;
        let form = InspectorForm::from_json(json).unwrap();
        assert_eq!(form.resource_pattern(), "arn:exact");
        assert_eq!(form.resource_type(), "AwsLambdaFunction");
    }

    #[test]
    fn test_validation_input_kinds() {
        let input = ValidationInput::from_json(r#"{"id":"*","resourcePattern":"arn:x"}"#).unwrap();
        match input {
            ValidationInput::Form(form) => {
                assert_eq!(form.id(), "*");
                assert_eq!(form.resource_pattern(), "arn:x");
                assert_eq!(form.resource_type, None);
            }
            other => panic!("expected a form, got {:?}", other),
        }

        let json = r#"{"id":"ELB.6","ser_id":"S1","product_name":"Security Hub","resource_type":"Aws"}"#;
        match ValidationInput::from_json(json).unwrap() {
            ValidationInput::Rule(rule) => {
                assert_eq!(rule.product(), Product::SecurityHub);
                assert_eq!(rule.resource_type, "Aws");
            }
            other => panic!("expected a rule record, got {:?}", other),
        }

        assert!(ValidationInput::from_json(r#""CVE-2025-66418""#).is_err());
    }

    #[test]
    fn test_parse_rule_wire_names() {
        let json = r#"{"id":"ELB.6","ser_id":"SER-2024-500","product_name":"Security Hub","findingType":"x"}"#;
        let rule = SuppressionRule::from_json(json).unwrap();
        assert_eq!(rule.id, "ELB.6");
        assert_eq!(rule.ser_id, "SER-2024-500");
        assert_eq!(rule.finding_type, "x");
        assert_eq!(rule.due_date, "");
    }

    #[test]
    fn test_product_classification() {
        assert_eq!(Product::from_name("inspector"), Product::Inspector);
        assert_eq!(Product::from_name("Security Hub"), Product::SecurityHub);
        assert_eq!(
            Product::from_name("GuardDuty"),
            Product::Other("GuardDuty".to_string())
        );
    }

    #[test]
    fn test_apply_finding_type() {
        let mut rule = SuppressionRule {
            product_name: "INSPECTOR".to_string(),
            ..Default::default()
        };
        rule.apply_finding_type();
        assert_eq!(rule.finding_type, INSPECTOR_FINDING_TYPE);

        let mut other = SuppressionRule {
            product_name: "GuardDuty".to_string(),
            finding_type: "Threats".to_string(),
            ..Default::default()
        };
        other.apply_finding_type();
        assert_eq!(other.finding_type, "Threats");
    }

    #[test]
    fn test_user_profile_groups() {
        let admin = UserProfile::new("Test User", "test.user@example.com").with_group(ADMIN_GROUP);
        assert!(admin.is_admin());
        assert!(admin.can_edit());
        assert_eq!(admin.display_group(), Some("Admin"));

        let reader = UserProfile::new("Reader", "reader@example.com").with_group(READONLY_GROUP);
        assert!(!reader.can_edit());
        assert_eq!(reader.display_group(), Some("Readonly"));

        assert_eq!(UserProfile::default().display_group(), None);
    }
}
