//! Configuration loading for suppression-rules
//!
//! Supports TOML configuration with embedded defaults.

use serde::Deserialize;
use std::path::PathBuf;

/// How strictly rule identifiers are validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// The checks performed live by the rule form
    #[default]
    Standard,

    /// Form checks plus character and partial-wildcard checks on identifiers
    Strict,
}

impl Strictness {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Some(Strictness::Standard),
            "strict" => Some(Strictness::Strict),
            _ => None,
        }
    }
}

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: true,
            audit_path: Some("~/.config/suppression-rules/audit.jsonl".to_string()),
        }
    }
}

/// Validation configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Identifier strictness
    pub strictness: Strictness,

    /// Product names whose rules get Inspector validation (case-insensitive)
    pub inspector_products: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Standard,
            inspector_products: vec!["Inspector".to_string()],
        }
    }
}

/// Rule store configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file holding the rules
    pub path: Option<String>,

    /// Seed a missing store file with the demo rules
    pub seed_demo_data: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Some("~/.config/suppression-rules/rules.json".to_string()),
            seed_demo_data: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub validation: ValidationConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Self {
        for path in Self::search_paths() {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(e) => {
                            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                        }
                    }
                }
            }
        }

        Config::default()
    }

    /// Config files tried by [`Config::load`], in order
    pub fn search_paths() -> Vec<PathBuf> {
        [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".config/suppression-rules/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/suppression-rules/config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from a specific path
    pub fn load_from(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded)
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.general.audit_path.as_ref().map(|p| Self::expand_path(p))
    }

    /// Get the rule store path (expanded)
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store.path.as_ref().map(|p| Self::expand_path(p))
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = true
audit_path = "~/.config/suppression-rules/audit.jsonl"

[validation]
strictness = "standard"
inspector_products = ["Inspector"]

[store]
path = "~/.config/suppression-rules/rules.json"
seed_demo_data = false
"#;
