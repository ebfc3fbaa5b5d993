//! MD012 - Multiple consecutive blank lines

use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

pub struct MD012;

impl Rule for MD012 {
    fn id(&self) -> &'static str {
        "MD012"
    }

    fn name(&self) -> &'static str {
        "no-multiple-blanks"
    }

    fn description(&self) -> &'static str {
        "Multiple consecutive blank lines"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let maximum = ctx.opt_usize("maximum", 1);
        let mut diagnostics = Vec::new();

        let mut run_start: Option<usize> = None;
        for lineno in 1..=snapshot.line_count() + 1 {
            let blank = snapshot
                .line_without_ending(lineno)
                .is_some_and(|l| l.trim().is_empty());
            if blank {
                run_start.get_or_insert(lineno);
                continue;
            }
            if let Some(start) = run_start.take() {
                let run_len = lineno - start;
                if run_len > maximum {
                    let first_extra = start + maximum;
                    let last_blank = lineno - 1;
                    let delete_from = snapshot.lines[first_extra - 1].0;
                    let delete_to = snapshot.lines[last_blank - 1].1;
                    diagnostics.push(
                        DiagnosticBuilder::new(
                            self.id(),
                            self.name(),
                            format!("Expected: {maximum}; Actual: {run_len}"),
                        )
                        .at(first_extra, 1, last_blank, 1)
                        .suggestion("Remove the extra blank lines")
                        .fix(TextEdit::delete(delete_from, delete_to))
                        .build(),
                    );
                }
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
    fn test_single_blank_passes() {
        let diags = check_rule(&MD012, "one\n\ntwo\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_double_blank_flagged() {
        let diags = check_rule(&MD012, "one\n\n\ntwo\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_line, 3);
        // Deleting the extra blank line leaves a single separator.
        assert_eq!(diags[0].fix_edits, vec![TextEdit::delete(5, 6)]);
    }

    #[test]
    fn test_triple_blank_single_diagnostic() {
        let diags = check_rule(&MD012, "one\n\n\n\ntwo\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Expected: 1; Actual: 3");
    }

    #[test]
    fn test_maximum_option() {
        let options = serde_json::json!({ "maximum": 2 });
        let diags = check_rule_with(&MD012, "one\n\n\ntwo\n", &options);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_two_separate_runs() {
        let diags = check_rule(&MD012, "a\n\n\nb\n\n\nc\n");
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_fix_produces_single_blank() {
        let content = "one\n\n\ntwo\n";
        let diags = check_rule(&MD012, content);
        let edit = &diags[0].fix_edits[0];
        let mut fixed = content.to_string();
        fixed.replace_range(edit.start..edit.end, &edit.replacement);
        assert_eq!(fixed, "one\n\ntwo\n");
    }
}
