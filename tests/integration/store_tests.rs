//! Integration tests for the rule store, persistence and audit log

use suppression_rules::audit::AuditLogger;
use suppression_rules::{
    Config, RuleStore, StoreError, Strictness, SuppressionRule, ValidationEngine,
};
use tempfile::TempDir;

fn inspector_rule(id: &str, ser_id: &str) -> SuppressionRule {
    SuppressionRule {
        id: id.to_string(),
        ser_id: ser_id.to_string(),
        finding_title: "Test finding".to_string(),
        product_name: "Inspector".to_string(),
        ser_link: format!("https://jira.example.com/browse/{}", ser_id),
        due_date: "2025-12-31".to_string(),
        resource_type: "AwsLambdaFunction".to_string(),
        ..Default::default()
    }
}

fn read_audit(dir: &TempDir) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(dir.path().join("audit.jsonl")).unwrap_or_default();
    content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/rules.json");

    let store = RuleStore::with_demo_data().unwrap();
    store.save_json(&path).unwrap();

    let loaded = RuleStore::load_json(&path).unwrap();
    assert_eq!(loaded.list(), store.list());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = RuleStore::load_json(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(StoreError::Io(_))));
}

#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(RuleStore::load_json(&path), Err(StoreError::Json(_))));
}

#[test]
fn test_changes_are_audited() {
    let dir = TempDir::new().unwrap();
    let logger = AuditLogger::new(Some(dir.path().join("audit.jsonl").as_path()));
    let mut store = RuleStore::new().with_audit(logger);

    let rule = inspector_rule("CVE-2025-12345", "SER-1");
    store.create(rule.clone(), "alice").unwrap();

    let mut changed = rule.clone();
    changed.due_date = "2026-06-30".to_string();
    store.update(changed, "alice").unwrap();

    store.delete("CVE-2025-12345", "SER-1", "bob").unwrap();

    let entries = read_audit(&dir);
    let actions: Vec<&str> = entries.iter().map(|e| e["action"].as_str().unwrap()).collect();
    assert_eq!(actions, vec!["CREATE", "UPDATE", "DELETE"]);

    assert_eq!(entries[0]["actor"], "alice");
    assert_eq!(entries[1]["changes"]["due_date"]["old"], "2025-12-31");
    assert_eq!(entries[1]["changes"]["due_date"]["new"], "2026-06-30");
    assert_eq!(entries[2]["actor"], "bob");
    assert_eq!(entries[2]["rule_id"], "CVE-2025-12345");
}

#[test]
fn test_rejections_are_audited() {
    let dir = TempDir::new().unwrap();
    let logger = AuditLogger::new(Some(dir.path().join("audit.jsonl").as_path()));
    let mut store = RuleStore::new().with_audit(logger);

    let mut rule = inspector_rule("", "SER-2");
    rule.resource_type.clear();
    assert!(matches!(store.create(rule, "alice"), Err(StoreError::Invalid(_))));

    let entries = read_audit(&dir);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "REJECTED");
    assert_eq!(entries[0]["reason"], "missing-identifier,no-resource-field");
}

#[test]
fn test_strict_store_rejects_partial_wildcard() {
    let mut store = RuleStore::new().with_engine(ValidationEngine::new(Strictness::Strict));
    let err = store.create(inspector_rule("CVE-2025-*", "SER-3"), "alice").unwrap_err();
    assert!(err.to_string().contains("Partial wildcards"));
}

#[test]
fn test_configured_engine_controls_inspector_products() {
    let mut config = Config::default();
    config.validation.inspector_products = vec!["Inspector".into(), "Inspector Classic".into()];

    let mut store = RuleStore::new().with_engine(ValidationEngine::from_config(&config));
    let mut rule = inspector_rule("*", "SER-4");
    rule.product_name = "Inspector Classic".to_string();
    rule.resource_type = "Aws*".to_string();

    assert!(matches!(store.create(rule, "alice"), Err(StoreError::Invalid(_))));
}
