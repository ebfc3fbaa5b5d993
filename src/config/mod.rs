//! Typed configuration and file loading

mod resolve;

pub use resolve::{Resolution, resolve_rules};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::parser::Flavor;
use crate::types::{Error, Result, Severity};

/// How rule identifiers are rendered in output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFormat {
    /// `MD009`
    Id,
    /// `no-trailing-spaces`
    Name,
    /// `MD009/no-trailing-spaces`
    #[default]
    Combined,
}

/// Render a rule identifier according to the configured format.
pub fn format_rule_ident(id: &str, name: &str, format: RuleFormat) -> String {
    match format {
        RuleFormat::Id => id.to_string(),
        RuleFormat::Name => name.to_string(),
        RuleFormat::Combined => format!("{id}/{name}"),
    }
}

/// Per-rule configuration entry.
///
/// Either a bare boolean (`"MD009": false`) or a detailed object with
/// `enabled`, `severity`, and free-form `options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleOverride {
    /// Shorthand enable/disable
    Enabled(bool),
    /// Detailed configuration
    Detailed {
        /// Whether the rule runs; `None` keeps the rule's default
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enabled: Option<bool>,
        /// Severity override
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<Severity>,
        /// Free-form options interpreted by the rule
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<serde_json::Value>,
    },
}

impl RuleOverride {
    /// The entry's enabled flag, when set.
    pub fn enabled(&self) -> Option<bool> {
        match self {
            RuleOverride::Enabled(enabled) => Some(*enabled),
            RuleOverride::Detailed { enabled, .. } => *enabled,
        }
    }

    /// The entry's severity override, when set.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RuleOverride::Enabled(_) => None,
            RuleOverride::Detailed { severity, .. } => *severity,
        }
    }

    /// The entry's rule options, when set.
    pub fn options(&self) -> Option<&serde_json::Value> {
        match self {
            RuleOverride::Enabled(_) => None,
            RuleOverride::Detailed { options, .. } => options.as_ref(),
        }
    }
}

/// Configuration for a run.
///
/// The `rules` table preserves declaration order so that a rule configured
/// twice (by id and by name) resolves to the later definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Markdown dialect
    #[serde(default)]
    pub flavor: Flavor,

    /// Per-rule configuration, keyed by rule id or name
    #[serde(default)]
    pub rules: IndexMap<String, RuleOverride>,

    /// Rules to force-enable, overriding the rules table
    #[serde(default)]
    pub enable: Vec<String>,

    /// Rules to force-disable, overriding everything else
    #[serde(default)]
    pub disable: Vec<String>,

    /// Glob patterns for files to skip
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Whether to apply fixes
    #[serde(default)]
    pub fix: bool,

    /// Compute diffs without touching the filesystem
    #[serde(default)]
    pub dry_run: bool,

    /// Disable sidecar backups before write-back
    #[serde(default)]
    pub no_backups: bool,

    /// Worker count; `None` or 0 selects the number of hardware threads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,

    /// Restrict fixing to these rules; empty permits all fixable rules
    #[serde(default)]
    pub fix_rules: Vec<String>,

    /// How rule identifiers are rendered
    #[serde(default)]
    pub rule_format: RuleFormat,
}

impl Config {
    /// An empty configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file, detecting the format from the
    /// extension (JSON, YAML, or TOML). Malformed content is fatal.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Self::from_json(&content)
                .or_else(|_| Self::from_yaml(&content))
                .or_else(|_| Self::from_toml(&content)),
        }
    }

    /// Parse a JSON configuration string.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::ConfigInvalid(e.to_string()))
    }

    /// Parse a YAML configuration string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).map_err(|e| Error::ConfigInvalid(e.to_string()))
    }

    /// Parse a TOML configuration string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigInvalid(e.to_string()))
    }

    /// Config file names searched during auto-discovery.
    const DISCOVERY_NAMES: [&'static str; 4] = [
        ".mdguard.json",
        ".mdguard.yaml",
        ".mdguard.yml",
        ".mdguard.toml",
    ];

    /// Walk up from `start_dir` looking for a config file.
    pub fn discover(start_dir: impl AsRef<Path>) -> Option<Result<Self>> {
        let mut dir = start_dir.as_ref().to_path_buf();
        loop {
            for name in &Self::DISCOVERY_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(Self::from_file(&candidate));
                }
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// The backup policy implied by this config.
    pub fn backups_enabled(&self) -> bool {
        !self.no_backups
    }

    /// The fix allow-list as a set, `None` when unrestricted.
    pub fn fix_allow_list(&self) -> Option<Vec<String>> {
        if self.fix_rules.is_empty() {
            None
        } else {
            Some(self.fix_rules.clone())
        }
    }

    /// Ignore globs merged into discovery excludes.
    pub fn ignore_globs(&self) -> &[String] {
        &self.ignore
    }

    /// Resolved worker count request (0 = auto).
    pub fn jobs_or_default(&self) -> usize {
        self.jobs.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.flavor, Flavor::CommonMark);
        assert!(config.rules.is_empty());
        assert!(!config.fix);
        assert!(config.backups_enabled());
    }

    #[test]
    fn test_json_parsing() {
        let config = Config::from_json(
            r#"{
                "flavor": "gfm",
                "rules": {
                    "MD009": false,
                    "MD013": { "severity": "error", "options": { "line_length": 100 } }
                },
                "fix": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.flavor, Flavor::Gfm);
        assert_eq!(config.rules["MD009"].enabled(), Some(false));
        assert_eq!(config.rules["MD013"].severity(), Some(Severity::Error));
        assert_eq!(
            config.rules["MD013"].options().unwrap()["line_length"],
            serde_json::json!(100)
        );
        assert!(config.fix);
    }

    #[test]
    fn test_yaml_parsing() {
        let config = Config::from_yaml(
            "flavor: gfm\nrules:\n  no-trailing-spaces:\n    enabled: true\ndisable:\n  - MD013\n",
        )
        .unwrap();
        assert_eq!(config.flavor, Flavor::Gfm);
        assert_eq!(config.disable, vec!["MD013"]);
    }

    #[test]
    fn test_toml_parsing() {
        let config = Config::from_toml(
            "flavor = \"commonmark\"\nfix = true\n\n[rules.MD009]\nenabled = false\n",
        )
        .unwrap();
        assert!(config.fix);
        assert_eq!(config.rules["MD009"].enabled(), Some(false));
    }

    #[test]
    fn test_rules_table_preserves_order() {
        let config = Config::from_json(
            r#"{ "rules": { "MD009": false, "no-trailing-spaces": true, "MD010": false } }"#,
        )
        .unwrap();
        let keys: Vec<_> = config.rules.keys().cloned().collect();
        assert_eq!(keys, vec!["MD009", "no-trailing-spaces", "MD010"]);
    }

    #[test]
    fn test_malformed_json_is_config_invalid() {
        assert!(matches!(
            Config::from_json("{ nope"),
            Err(Error::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "colour": true }"#),
            Err(Error::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub").join("deep");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(
            dir.path().join(".mdguard.json"),
            r#"{ "rules": { "MD009": false } }"#,
        )
        .unwrap();

        let config = Config::discover(&sub).unwrap().unwrap();
        assert_eq!(config.rules["MD009"].enabled(), Some(false));
    }

    #[test]
    fn test_discover_none_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::discover(dir.path()).is_none());
    }

    #[test]
    fn test_fix_allow_list() {
        let mut config = Config::new();
        assert!(config.fix_allow_list().is_none());
        config.fix_rules = vec!["MD009".to_string()];
        assert_eq!(config.fix_allow_list().unwrap(), vec!["MD009"]);
    }
}
