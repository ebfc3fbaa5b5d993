//! JSON output formatter

use crate::analysis::Report;
use crate::config::{RuleFormat, format_rule_ident};
use crate::types::RunResult;

/// Format a run as a JSON document: flat diagnostics, per-file errors, and
/// totals. Aggregates come from the analysis report.
pub fn format_json(run: &RunResult, rule_format: RuleFormat) -> String {
    let report = Report::from_run(run);

    let diagnostics: Vec<_> = report
        .diagnostics
        .iter()
        .map(|d| {
            serde_json::json!({
                "rule": format_rule_ident(&d.rule_id, &d.rule_name, rule_format),
                "severity": d.severity,
                "message": d.message,
                "suggestion": d.suggestion,
                "path": d.file_path,
                "start_line": d.start_line,
                "start_column": d.start_column,
                "end_line": d.end_line,
                "end_column": d.end_column,
                "fixable": d.is_fixable(),
            })
        })
        .collect();

    let errors: Vec<_> = run
        .files
        .iter()
        .filter_map(|outcome| {
            outcome.error.as_ref().map(|error| {
                serde_json::json!({
                    "path": outcome.path,
                    "error": error.to_string(),
                })
            })
        })
        .collect();

    let value = serde_json::json!({
        "diagnostics": diagnostics,
        "errors": errors,
        "files": report.files,
        "rules": report.rules,
        "totals": report.totals,
    });
    serde_json::to_string_pretty(&value).expect("report serializes")
}
