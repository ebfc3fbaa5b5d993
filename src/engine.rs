//! Rule engine: runs the enabled rules over a snapshot and collects
//! diagnostics in a stable order

use log::warn;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::parser::FileSnapshot;
use crate::rules::{Registry, RuleContext};
use crate::types::{Diagnostic, Severity};

/// A rule selected for execution, with its effective configuration.
///
/// Produced by config resolution; one instance maps to exactly one severity,
/// which the engine applies uniformly to every diagnostic the rule emits.
#[derive(Debug, Clone)]
pub struct ResolvedRule {
    /// Canonical rule id
    pub id: String,
    /// Effective severity for this run
    pub severity: Severity,
    /// Free-form rule options (`Null` when unset)
    pub options: serde_json::Value,
}

/// Run the resolved rules over a snapshot.
///
/// Rule failures never abort the file: a panic or error is converted into a
/// synthetic error-severity diagnostic naming the offending rule, and the
/// remaining rules continue. Diagnostics with positions outside the content
/// are rejected the same way. The returned list is sorted by
/// `(start_line, start_column, rule_id)`.
pub fn run_rules(
    registry: &Registry,
    rules: &[ResolvedRule],
    snapshot: &FileSnapshot,
) -> Vec<Diagnostic> {
    let mut all = Vec::new();

    for resolved in rules {
        let Some(rule) = registry.get(&resolved.id) else {
            all.push(synthetic_failure(
                snapshot,
                &resolved.id,
                "rule missing from registry",
            ));
            continue;
        };

        let ctx = RuleContext {
            snapshot,
            options: &resolved.options,
            severity: resolved.severity,
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| rule.check(&ctx)));
        let diagnostics = match outcome {
            Ok(Ok(diagnostics)) => diagnostics,
            Ok(Err(err)) => {
                warn!("rule {} failed on {}: {err}", rule.id(), snapshot.path.display());
                all.push(synthetic_failure(snapshot, rule.id(), &err.to_string()));
                continue;
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(
                    "rule {} panicked on {}: {message}",
                    rule.id(),
                    snapshot.path.display()
                );
                all.push(synthetic_failure(snapshot, rule.id(), &message));
                continue;
            }
        };

        for mut diagnostic in diagnostics {
            diagnostic.severity = resolved.severity;
            diagnostic.file_path = snapshot.path.clone();
            if let Err(reason) = validate(snapshot, &diagnostic) {
                all.push(synthetic_failure(snapshot, rule.id(), &reason));
                continue;
            }
            all.push(diagnostic);
        }
    }

    all.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    all
}

/// Reject diagnostics whose positions or edits fall outside the content.
fn validate(snapshot: &FileSnapshot, diagnostic: &Diagnostic) -> Result<(), String> {
    let line_bound = snapshot.line_count().max(1);
    if diagnostic.start_line < 1
        || diagnostic.start_line > diagnostic.end_line
        || diagnostic.end_line > line_bound
    {
        return Err(format!(
            "diagnostic lines {}..{} outside content ({} lines)",
            diagnostic.start_line,
            diagnostic.end_line,
            snapshot.line_count()
        ));
    }
    if diagnostic.start_column < 1 || diagnostic.end_column < 1 {
        return Err("diagnostic columns must be 1-based".to_string());
    }
    for edit in &diagnostic.fix_edits {
        if edit.start > edit.end || edit.end > snapshot.content.len() {
            return Err(format!(
                "edit {}..{} outside content ({} bytes)",
                edit.start,
                edit.end,
                snapshot.content.len()
            ));
        }
        if !snapshot.content.is_char_boundary(edit.start)
            || !snapshot.content.is_char_boundary(edit.end)
        {
            return Err(format!(
                "edit {}..{} splits a UTF-8 character",
                edit.start, edit.end
            ));
        }
    }
    Ok(())
}

/// Synthetic diagnostics are always errors so failures never drop silently
/// below a severity filter.
fn synthetic_failure(snapshot: &FileSnapshot, rule_id: &str, message: &str) -> Diagnostic {
    Diagnostic {
        rule_id: rule_id.to_string(),
        rule_name: rule_id.to_lowercase(),
        severity: Severity::Error,
        message: format!("rule failed: {message}"),
        suggestion: None,
        file_path: snapshot.path.clone(),
        start_line: 1,
        start_column: 1,
        end_line: 1,
        end_column: 1,
        fix_edits: Vec::new(),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
