//! Runtime configuration: built-in defaults, an optional JSON file, then environment.
//! Each layer only overrides the fields it sets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const ENV_CONFIG: &str = "ROLEGATE_CONFIG";
pub const ENV_ROOT: &str = "ROLEGATE_ROOT";
pub const ENV_AUDIT_LOG: &str = "ROLEGATE_AUDIT_LOG";
pub const ENV_AUDIT_ENABLED: &str = "ROLEGATE_AUDIT_ENABLED";

/// Fully resolved configuration used to open a [`crate::Cms`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CmsConfig {
    /// Directory holding the ledger, index, content directory and audit log.
    pub root: PathBuf,
    pub ledger_file: String,
    pub index_file: String,
    pub content_dir: String,
    pub audit_log_file: String,
    /// Attach the default file-logging audit subscriber.
    pub audit_log_enabled: bool,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ledger_file: "users.txt".to_string(),
            index_file: "files.txt".to_string(),
            content_dir: "files".to_string(),
            audit_log_file: "log.txt".to_string(),
            audit_log_enabled: true,
        }
    }
}

/// Partial configuration as read from a JSON file; unspecified values inherit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub ledger_file: Option<String>,
    pub index_file: Option<String>,
    pub content_dir: Option<String>,
    pub audit_log_file: Option<String>,
    pub audit_log_enabled: Option<bool>,
}

impl ConfigOverrides {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Collect overrides from a variable lookup (the process environment in production).
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let audit_log_enabled = match lookup(ENV_AUDIT_ENABLED) {
            Some(v) => Some(parse_bool(&v).with_context(|| format!("{}='{}'", ENV_AUDIT_ENABLED, v))?),
            None => None,
        };
        Ok(Self {
            root: lookup(ENV_ROOT).map(PathBuf::from),
            audit_log_file: lookup(ENV_AUDIT_LOG),
            audit_log_enabled,
            ..Default::default()
        })
    }
}

fn parse_bool(v: &str) -> Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

impl CmsConfig {
    /// Build the effective config: `base`, then each override layer in order.
    pub fn from_layers(base: CmsConfig, layers: &[ConfigOverrides]) -> Self {
        let mut cfg = base;
        for l in layers {
            if let Some(v) = &l.root { cfg.root = v.clone(); }
            if let Some(v) = &l.ledger_file { cfg.ledger_file = v.clone(); }
            if let Some(v) = &l.index_file { cfg.index_file = v.clone(); }
            if let Some(v) = &l.content_dir { cfg.content_dir = v.clone(); }
            if let Some(v) = &l.audit_log_file { cfg.audit_log_file = v.clone(); }
            if let Some(v) = l.audit_log_enabled { cfg.audit_log_enabled = v; }
        }
        cfg
    }

    /// Defaults <- `$ROLEGATE_CONFIG` JSON file (if set) <- `ROLEGATE_*` variables.
    pub fn load() -> Result<Self> {
        let lookup = |k: &str| std::env::var(k).ok();
        let mut layers = Vec::new();
        if let Some(path) = lookup(ENV_CONFIG) {
            layers.push(ConfigOverrides::from_json_file(Path::new(&path))?);
        }
        layers.push(ConfigOverrides::from_env_with(lookup)?);
        Ok(Self::from_layers(CmsConfig::default(), &layers))
    }

    /// Defaults rooted at `root`; convenient for tests and embedding.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), ..Default::default() }
    }
}
