//! MD013 - Line length

use unicode_width::UnicodeWidthStr;

use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, Severity};

pub struct MD013;

impl Rule for MD013 {
    fn id(&self) -> &'static str {
        "MD013"
    }

    fn name(&self) -> &'static str {
        "line-length"
    }

    fn description(&self) -> &'static str {
        "Line length"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let limit = ctx.opt_usize("line_length", 80);
        let mut diagnostics = Vec::new();

        for lineno in 1..=snapshot.line_count() {
            let Some(line) = snapshot.line_without_ending(lineno) else {
                continue;
            };
            let width = line.width();
            if width > limit {
                diagnostics.push(
                    DiagnosticBuilder::new(
                        self.id(),
                        self.name(),
                        format!("Expected: {limit}; Actual: {width}"),
                    )
                    .at(lineno, limit + 1, lineno, width + 1)
                    .build(),
                );
            }
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::{check_rule, check_rule_with};

    #[test]
    fn test_short_lines_pass() {
        let diags = check_rule(&MD013, "short\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_long_line_flagged() {
        let content = format!("{}\n", "x".repeat(85));
        let diags = check_rule(&MD013, &content);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_column, 81);
        assert_eq!(diags[0].message, "Expected: 80; Actual: 85");
    }

    #[test]
    fn test_exact_limit_passes() {
        let content = format!("{}\n", "x".repeat(80));
        let diags = check_rule(&MD013, &content);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_custom_limit() {
        let options = serde_json::json!({ "line_length": 10 });
        let diags = check_rule_with(&MD013, "this line is too long\n", &options);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_width_counts_display_columns() {
        // CJK characters are two columns wide each.
        let options = serde_json::json!({ "line_length": 5 });
        let diags = check_rule_with(&MD013, "漢字漢字\n", &options);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Expected: 5; Actual: 8");
    }
}
