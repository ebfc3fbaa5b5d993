//! Enabled-set and severity resolution

use log::warn;
use std::collections::HashSet;

use crate::config::Config;
use crate::engine::ResolvedRule;
use crate::rules::Registry;
use crate::types::Result;

/// Outcome of resolving a configuration against a registry.
#[derive(Debug)]
pub struct Resolution {
    /// Enabled rules with their effective severity and options, in registry
    /// order
    pub rules: Vec<ResolvedRule>,
    /// Fix allow-list as canonical ids; `None` when unrestricted
    pub fix_rules: Option<HashSet<String>>,
    /// Non-fatal warnings (duplicate definitions)
    pub warnings: Vec<String>,
}

struct RuleState {
    enabled: bool,
    severity: crate::types::Severity,
    options: serde_json::Value,
}

/// Resolve the enabled rule set for a run.
///
/// Layered precedence, later layers winning: registry defaults, the
/// config-file `rules` table in declaration order, the `enable` list, the
/// `disable` list. A rule configured under both its id and its name keeps
/// the later definition and produces a duplicate warning. Unknown rule
/// references are fatal.
pub fn resolve_rules(registry: &Registry, config: &Config) -> Result<Resolution> {
    let mut warnings = Vec::new();

    // Registry order, so resolved rules execute in registration order.
    let mut states: indexmap::IndexMap<String, RuleState> = registry
        .iter()
        .map(|rule| {
            (
                rule.id().to_string(),
                RuleState {
                    enabled: rule.default_enabled(),
                    severity: rule.default_severity(),
                    options: serde_json::Value::Null,
                },
            )
        })
        .collect();

    // Config-file rules table, declaration order. Later definitions win.
    let mut seen: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for (key, entry) in &config.rules {
        let id = registry.resolve(key)?;
        if let Some(previous) = seen.insert(id.clone(), key.clone())
            && previous != *key
        {
            let message = format!(
                "rule {id} configured as both {previous:?} and {key:?}; the later definition wins"
            );
            warn!("{message}");
            warnings.push(message);
        }
        let Some(state) = states.get_mut(&id) else {
            continue;
        };
        if let Some(enabled) = entry.enabled() {
            state.enabled = enabled;
        }
        if let Some(severity) = entry.severity() {
            state.severity = severity;
        }
        if let Some(options) = entry.options() {
            state.options = options.clone();
        }
    }

    // Command-level lists override the table; disable beats enable.
    for key in &config.enable {
        let id = registry.resolve(key)?;
        if let Some(state) = states.get_mut(&id) {
            state.enabled = true;
        }
    }
    for key in &config.disable {
        let id = registry.resolve(key)?;
        if let Some(state) = states.get_mut(&id) {
            state.enabled = false;
        }
    }

    let rules = states
        .into_iter()
        .filter(|(_, state)| state.enabled)
        .map(|(id, state)| ResolvedRule {
            id,
            severity: state.severity,
            options: state.options,
        })
        .collect();

    let fix_rules = if config.fix_rules.is_empty() {
        None
    } else {
        let mut set = HashSet::new();
        for key in &config.fix_rules {
            set.insert(registry.resolve(key)?);
        }
        Some(set)
    };

    Ok(Resolution {
        rules,
        fix_rules,
        warnings,
    })
}
