//! Plain text output formatter

use crate::config::{RuleFormat, format_rule_ident};
use crate::types::RunResult;

/// Format a run as one line per diagnostic, one line per file error, and a
/// trailing summary.
pub fn format_text(run: &RunResult, rule_format: RuleFormat) -> String {
    let mut out = Vec::new();

    for outcome in &run.files {
        if let Some(result) = &outcome.result {
            for diag in &result.diagnostics {
                let ident = format_rule_ident(&diag.rule_id, &diag.rule_name, rule_format);
                let mut line = format!(
                    "{}:{}:{} {} {} {}",
                    outcome.path.display(),
                    diag.start_line,
                    diag.start_column,
                    diag.severity,
                    ident,
                    diag.message
                );
                if let Some(suggestion) = &diag.suggestion {
                    line.push_str(&format!(" ({suggestion})"));
                }
                out.push(line);
            }
            if result.skipped
                && let Some(reason) = result.skip_reason
            {
                out.push(format!(
                    "{}: skipped: {reason}",
                    outcome.path.display()
                ));
            }
        }
        if let Some(error) = &outcome.error {
            out.push(format!("{}: error: {error}", outcome.path.display()));
        }
    }

    let stats = &run.stats;
    if stats.total_diagnostics() > 0 || stats.files_errored > 0 {
        out.push(format!(
            "{} issues in {} of {} files ({} errors, {} warnings, {} infos, {} fixable)",
            stats.total_diagnostics(),
            stats.files_with_issues,
            stats.files_processed,
            stats.errors,
            stats.warnings,
            stats.infos,
            stats.fixable
        ));
    }
    if stats.files_modified > 0 {
        out.push(format!(
            "fixed {} files ({} edits applied, {} dropped)",
            stats.files_modified, stats.edits_applied, stats.edits_dropped
        ));
    }

    out.join("\n")
}
