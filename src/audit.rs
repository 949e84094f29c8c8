//! JSONL audit logging for suppression-rules
//!
//! Records every change to the rule store, and every rejected change, to a
//! JSONL file for later review.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::SuppressionRule;

/// Kind of change recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Rejected,
}

/// Old and new value of one changed field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Compute field-level differences between two versions of a rule
///
/// A missing version (create or delete) is reported as `null`. Empty fields
/// are skipped on create and delete.
pub fn compute_diffs(
    old: Option<&SuppressionRule>,
    new: Option<&SuppressionRule>,
) -> BTreeMap<String, FieldChange> {
    let old_fields = fields_of(old);
    let new_fields = fields_of(new);

    let mut changes = BTreeMap::new();
    let names: std::collections::BTreeSet<&String> =
        old_fields.keys().chain(new_fields.keys()).collect();

    for name in names {
        let old_value = old_fields.get(name).cloned().unwrap_or(Value::Null);
        let new_value = new_fields.get(name).cloned().unwrap_or(Value::Null);

        if old_value == new_value || (is_unset(&old_value) && is_unset(&new_value)) {
            continue;
        }

        changes.insert(
            name.clone(),
            FieldChange {
                old: old_value,
                new: new_value,
            },
        );
    }

    changes
}

fn fields_of(rule: Option<&SuppressionRule>) -> serde_json::Map<String, Value> {
    match rule.map(serde_json::to_value) {
        Some(Ok(Value::Object(map))) => map,
        _ => serde_json::Map::new(),
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the change
    pub timestamp: DateTime<Utc>,

    /// What happened (CREATE, UPDATE, DELETE, REJECTED)
    pub action: AuditAction,

    /// Identifier of the affected rule
    pub rule_id: String,

    /// SER identifier of the affected rule
    pub ser_id: String,

    /// Who made the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Changed fields
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub changes: BTreeMap<String, FieldChange>,

    /// Reason a change was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEntry {
    /// Create an entry for an applied change
    pub fn change(
        action: AuditAction,
        old: Option<&SuppressionRule>,
        new: Option<&SuppressionRule>,
        actor: Option<&str>,
    ) -> Self {
        let (rule_id, ser_id) = new
            .or(old)
            .map(|r| (r.id.clone(), r.ser_id.clone()))
            .unwrap_or_default();

        Self {
            timestamp: Utc::now(),
            action,
            rule_id,
            ser_id,
            actor: actor.map(String::from),
            changes: compute_diffs(old, new),
            reason: None,
        }
    }

    /// Create an entry for a rejected change
    pub fn rejected(rule: &SuppressionRule, actor: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action: AuditAction::Rejected,
            rule_id: rule.id.clone(),
            ser_id: rule.ser_id.clone(),
            actor: actor.map(String::from),
            changes: BTreeMap::new(),
            reason: Some(reason.into()),
        }
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            // Ensure parent directory exists
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .ok()
                .map(BufWriter::new)
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
