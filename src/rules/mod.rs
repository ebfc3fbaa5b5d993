//! Rule contract and the built-in rule set

mod registry;

mod md001;
mod md009;
mod md010;
mod md012;
mod md013;
mod md018;
mod md019;
mod md022;
mod md025;
mod md026;
mod md040;
mod md041;
mod md047;

pub use registry::Registry;

use std::sync::Arc;

use crate::parser::FileSnapshot;
use crate::types::{Diagnostic, Result, Severity};

/// Parameters passed to a rule's check function.
///
/// The snapshot is immutable and shared by every rule run on the file; the
/// options value is the rule's own free-form configuration (`Null` when the
/// user supplied none). `severity` is the effective severity the engine
/// stamps on every diagnostic the rule emits.
pub struct RuleContext<'a> {
    /// The parsed file
    pub snapshot: &'a FileSnapshot,
    /// Rule-specific configuration
    pub options: &'a serde_json::Value,
    /// Effective severity for this rule instance
    pub severity: Severity,
}

impl RuleContext<'_> {
    /// Read an unsigned integer option, falling back to `default`.
    pub fn opt_usize(&self, key: &str, default: usize) -> usize {
        self.options
            .get(key)
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(default)
    }

    /// Read a string option, falling back to `default`.
    pub fn opt_str<'s>(&'s self, key: &str, default: &'s str) -> &'s str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }

    /// Read a boolean option, falling back to `default`.
    pub fn opt_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }
}

/// Trait that all rules implement.
///
/// Rules are side-effect-free and deterministic given the same snapshot and
/// options; the engine depends on that for parallel execution.
pub trait Rule: Send + Sync {
    /// Canonical rule id, e.g. `MD009`.
    fn id(&self) -> &'static str;

    /// Human-readable rule name, e.g. `no-trailing-spaces`.
    fn name(&self) -> &'static str;

    /// Additional names this rule answers to.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-line description of what the rule checks.
    fn description(&self) -> &'static str;

    /// Severity applied when the configuration does not override it.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether the rule can emit fix edits.
    fn fixable(&self) -> bool {
        false
    }

    /// Whether the rule runs when the configuration does not mention it.
    fn default_enabled(&self) -> bool {
        true
    }

    /// Check the file and return diagnostics.
    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>>;
}

/// The built-in rule set, in id order.
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(md001::MD001),
        Arc::new(md009::MD009),
        Arc::new(md010::MD010),
        Arc::new(md012::MD012),
        Arc::new(md013::MD013),
        Arc::new(md018::MD018),
        Arc::new(md019::MD019),
        Arc::new(md022::MD022),
        Arc::new(md025::MD025),
        Arc::new(md026::MD026),
        Arc::new(md040::MD040),
        Arc::new(md041::MD041),
        Arc::new(md047::MD047),
    ]
}

/// Iterate the 1-based numbers and text of lines that sit outside fenced
/// code blocks. Shared by the line-oriented rules that must not fire inside
/// fences.
pub(crate) fn lines_outside_fences<'a>(
    snapshot: &'a FileSnapshot,
) -> impl Iterator<Item = (usize, &'a str)> {
    let mut in_fence = false;
    (1..=snapshot.line_count()).filter_map(move |lineno| {
        let line = snapshot.line_without_ending(lineno)?;
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            return None;
        }
        (!in_fence).then_some((lineno, line))
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_are_unique() {
        let rules = builtin_rules();
        let mut ids: Vec<_> = rules.iter().map(|r| r.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_fixable_flag_matches_rules() {
        let registry = Registry::with_builtin_rules();
        assert!(registry.get("MD009").unwrap().fixable());
        assert!(!registry.get("MD013").unwrap().fixable());
    }
}
