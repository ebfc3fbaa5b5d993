//! MD026 - Trailing punctuation in heading

use crate::parser::{NodeKind, Walk};
use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

const DEFAULT_PUNCTUATION: &str = ".,;:!";

pub struct MD026;

impl Rule for MD026 {
    fn id(&self) -> &'static str {
        "MD026"
    }

    fn name(&self) -> &'static str {
        "no-trailing-punctuation"
    }

    fn description(&self) -> &'static str {
        "Trailing punctuation in heading"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let punctuation = ctx.opt_str("punctuation", DEFAULT_PUNCTUATION);
        let mut diagnostics = Vec::new();

        snapshot.walk(|id, node| {
            let NodeKind::Heading { .. } = node.kind else {
                return Walk::Continue;
            };
            let Some((span_start, span_end)) = snapshot.node_span(id) else {
                return Walk::SkipChildren;
            };
            let text = &snapshot.content[span_start..span_end];
            // Ignore ATX closing sequences like `# Title #`.
            let visible = text.trim_end().trim_end_matches('#').trim_end();
            let Some(last) = visible.chars().last() else {
                return Walk::SkipChildren;
            };
            if punctuation.contains(last) {
                let punct_start = span_start + visible.len() - last.len_utf8();
                let (line, column) = snapshot.position_of(punct_start);
                diagnostics.push(
                    DiagnosticBuilder::new(
                        self.id(),
                        self.name(),
                        format!("Heading ends with {last:?}"),
                    )
                    .at(line, column, line, column + 1)
                    .suggestion("Remove the trailing punctuation")
                    .fix(TextEdit::delete(punct_start, punct_start + last.len_utf8()))
                    .build(),
                );
            }
            Walk::SkipChildren
        });

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::{check_rule, check_rule_with};

    #[test]
    fn test_clean_heading_passes() {
        let diags = check_rule(&MD026, "# Clean heading\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_trailing_period_flagged() {
        let diags = check_rule(&MD026, "# Heading.\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_column, 10);
        assert_eq!(diags[0].fix_edits, vec![TextEdit::delete(9, 10)]);
    }

    #[test]
    fn test_trailing_colon_flagged() {
        let diags = check_rule(&MD026, "## Section:\n");
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_question_mark_allowed_by_default() {
        let diags = check_rule(&MD026, "# Why?\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_custom_punctuation_set() {
        let options = serde_json::json!({ "punctuation": "?" });
        let diags = check_rule_with(&MD026, "# Why?\n", &options);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_closed_atx_heading() {
        let diags = check_rule(&MD026, "# Title. #\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].fix_edits, vec![TextEdit::delete(7, 8)]);
    }

    #[test]
    fn test_fix_roundtrip() {
        let content = "# Heading.\n";
        let diags = check_rule(&MD026, content);
        let edit = &diags[0].fix_edits[0];
        let mut fixed = content.to_string();
        fixed.replace_range(edit.start..edit.end, "");
        assert_eq!(fixed, "# Heading\n");
    }
}
