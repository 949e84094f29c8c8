//! In-memory suppression rule store
//!
//! A caller-owned repository of rules keyed by `(id, ser_id)`. Inspector rules
//! are validated before they are stored, and every change is audited.

use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::audit::{AuditAction, AuditEntry, AuditLogger};
use crate::model::SuppressionRule;
use crate::result::FormValidationResult;
use crate::validation::ValidationEngine;

/// Errors returned by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cannot {action} item which is missing a {field}.")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    #[error("Cannot create item which already exists.")]
    AlreadyExists,

    #[error("Item not found!")]
    NotFound,

    #[error("Input contains no changes.")]
    NoChanges,

    #[error("Inspector validation failed: {0}")]
    Invalid(FormValidationResult),

    #[error("failed to access rule file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rule file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rules shipped for local development and demos
pub const DEMO_RULES_JSON: &str = r#"[
  {
    "id": "CVE-2025-66418",
    "finding_title": "urllib3 vulnerability in sw-oasis-esf functions",
    "product_name": "Inspector",
    "findingType": "Vulnerabilities",
    "ser_id": "SER-2025-001",
    "ser_link": "https://jira.example.com/browse/SER-2025-001",
    "due_date": "2025-03-01",
    "resource_pattern": "arn:aws:lambda:*:*:function:sw-oasis-esf-*:*",
    "description": "Suppress urllib3 CVE for sw-oasis-esf Lambda functions"
  },
  {
    "id": "CVE-2025-66471",
    "finding_title": "urllib3 vulnerability variant",
    "product_name": "Inspector",
    "findingType": "Vulnerabilities",
    "ser_id": "SER-2025-002",
    "ser_link": "https://jira.example.com/browse/SER-2025-002",
    "due_date": "2025-03-01",
    "resource_pattern": "arn:aws:lambda:*:*:function:sw-oasis-esf-*:*",
    "description": "Suppress urllib3 CVE variant for sw-oasis-esf Lambda functions"
  },
  {
    "id": "CWE-117,93",
    "finding_title": "Log injection vulnerability",
    "product_name": "Inspector",
    "findingType": "Vulnerabilities",
    "ser_id": "SER-2025-003",
    "ser_link": "https://jira.example.com/browse/SER-2025-003",
    "due_date": "2025-04-15",
    "resource_pattern": "arn:aws:lambda:*:*:function:sw-oasis-esf-*:*",
    "description": "Suppress log injection CWE for sw-oasis-esf Lambda functions"
  },
  {
    "id": "CWE-409",
    "finding_title": "Zip bomb attack vulnerability",
    "product_name": "Inspector",
    "findingType": "Vulnerabilities",
    "ser_id": "SER-2025-010",
    "ser_link": "https://jira.example.com/browse/SER-2025-010",
    "due_date": "2025-02-28",
    "resource_pattern": "arn:aws:lambda:*:*:function:AWS_Control_Tower_Upgrade-*:*",
    "description": "Suppress zip bomb CWE for Control Tower Lambda functions"
  },
  {
    "id": "CWE-22",
    "finding_title": "Path traversal vulnerability",
    "product_name": "Inspector",
    "findingType": "Vulnerabilities",
    "ser_id": "SER-2025-011",
    "ser_link": "https://jira.example.com/browse/SER-2025-011",
    "due_date": "2025-02-28",
    "resource_pattern": "arn:aws:lambda:*:*:function:AWS_Control_Tower_Upgrade-*:*",
    "description": "Suppress path traversal CWE for Control Tower Lambda functions"
  },
  {
    "id": "ELB.6",
    "finding_title": "Application Load Balancer deletion protection should be enabled",
    "product_name": "Security Hub",
    "findingType": "Industry and Regulatory Standards",
    "ser_id": "SER-2024-500",
    "ser_link": "https://jira.example.com/browse/SER-2024-500",
    "due_date": "2025-06-30",
    "resource_pattern": "arn:aws:elasticloadbalancing:*:*:loadbalancer/app/*/*",
    "resource_type": "AwsElbv2LoadBalancer",
    "description": "Suppress ELB.6 for specific load balancers"
  }
]"#;

type RuleKey = (String, String);

fn key_of(rule: &SuppressionRule) -> RuleKey {
    (rule.id.clone(), rule.ser_id.clone())
}

fn require(value: &str, action: &'static str, field: &'static str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::MissingField { action, field });
    }
    Ok(())
}

/// The rule store
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: BTreeMap<RuleKey, SuppressionRule>,
    engine: ValidationEngine,
    audit: AuditLogger,
}

impl RuleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given rules; later duplicates replace earlier ones
    pub fn from_rules(rules: impl IntoIterator<Item = SuppressionRule>) -> Self {
        let mut store = Self::new();
        for rule in rules {
            store.rules.insert(key_of(&rule), rule);
        }
        store
    }

    /// Create a store seeded with the demo rules
    pub fn with_demo_data() -> Result<Self, StoreError> {
        let rules: Vec<SuppressionRule> = serde_json::from_str(DEMO_RULES_JSON)?;
        Ok(Self::from_rules(rules))
    }

    /// Load rules from a JSON array file
    pub fn load_json(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let rules: Vec<SuppressionRule> = serde_json::from_str(&content)?;
        Ok(Self::from_rules(rules))
    }

    /// Write all rules to a JSON array file
    pub fn save_json(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.list())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Use the given engine for Inspector validation
    pub fn with_engine(mut self, engine: ValidationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Record changes with the given audit logger
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }

    /// All rules, sorted by identifier
    pub fn list(&self) -> Vec<SuppressionRule> {
        self.rules.values().cloned().collect()
    }

    pub fn get(&self, id: &str, ser_id: &str) -> Option<&SuppressionRule> {
        self.rules.get(&(id.to_string(), ser_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose identifier suppresses the given finding identifier
    pub fn matching(&self, finding_id: &str) -> Vec<&SuppressionRule> {
        self.rules
            .values()
            .filter(|r| r.matches_finding_id(finding_id))
            .collect()
    }

    /// Add a new rule
    pub fn create(
        &mut self,
        mut rule: SuppressionRule,
        actor: &str,
    ) -> Result<&SuppressionRule, StoreError> {
        require(&rule.ser_link, "create", "SER link")?;
        require(&rule.product_name, "create", "ProductName")?;

        let key = key_of(&rule);
        if self.rules.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }

        self.validate(&rule, actor)?;
        rule.apply_finding_type();

        self.record(AuditEntry::change(
            AuditAction::Create,
            None,
            Some(&rule),
            actor_of(actor),
        ));
        Ok(self.rules.entry(key).or_insert(rule))
    }

    /// Replace an existing rule
    pub fn update(
        &mut self,
        mut rule: SuppressionRule,
        actor: &str,
    ) -> Result<&SuppressionRule, StoreError> {
        require(&rule.ser_id, "update", "SER Id")?;
        require(&rule.ser_link, "update", "SER link")?;
        require(&rule.finding_title, "update", "finding title")?;
        require(&rule.product_name, "update", "product name")?;
        require(&rule.due_date, "update", "due date")?;

        rule.apply_finding_type();

        let key = key_of(&rule);
        match self.rules.get(&key) {
            None => return Err(StoreError::NotFound),
            Some(existing) if *existing == rule => return Err(StoreError::NoChanges),
            Some(_) => {}
        }

        self.validate(&rule, actor)?;

        let entry = AuditEntry::change(
            AuditAction::Update,
            self.rules.get(&key),
            Some(&rule),
            actor_of(actor),
        );
        self.record(entry);

        let slot = self.rules.entry(key).or_default();
        *slot = rule;
        Ok(slot)
    }

    /// Remove a rule, returning it
    pub fn delete(
        &mut self,
        id: &str,
        ser_id: &str,
        actor: &str,
    ) -> Result<SuppressionRule, StoreError> {
        let removed = self
            .rules
            .remove(&(id.to_string(), ser_id.to_string()))
            .ok_or(StoreError::NotFound)?;

        self.record(AuditEntry::change(
            AuditAction::Delete,
            Some(&removed),
            None,
            actor_of(actor),
        ));
        Ok(removed)
    }

    fn validate(&mut self, rule: &SuppressionRule, actor: &str) -> Result<(), StoreError> {
        let result = self.engine.check_rule(rule);
        if result.is_valid() {
            return Ok(());
        }

        let codes: Vec<&str> = result.errors().map(|(_, e)| e.code()).collect();
        self.record(AuditEntry::rejected(rule, actor_of(actor), codes.join(",")));
        Err(StoreError::Invalid(result))
    }

    fn record(&mut self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            eprintln!("Warning: Failed to write audit log: {}", e);
        }
    }
}

fn actor_of(actor: &str) -> Option<&str> {
    let trimmed = actor.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
