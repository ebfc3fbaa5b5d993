//! MD018 - No space after hash on ATX style heading

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::{Rule, RuleContext, lines_outside_fences};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

static MISSING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[^#\s]").expect("valid regex"));

pub struct MD018;

impl Rule for MD018 {
    fn id(&self) -> &'static str {
        "MD018"
    }

    fn name(&self) -> &'static str {
        "no-missing-space-atx"
    }

    fn description(&self) -> &'static str {
        "No space after hash on atx style heading"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let mut diagnostics = Vec::new();

        for (lineno, line) in lines_outside_fences(snapshot) {
            let Some(caps) = MISSING_SPACE.captures(line) else {
                continue;
            };
            let hashes = caps[1].len();
            let (line_start, _) = snapshot.lines[lineno - 1];
            diagnostics.push(
                DiagnosticBuilder::new(self.id(), self.name(), "No space after hash")
                    .at(lineno, hashes + 1, lineno, hashes + 2)
                    .suggestion("Insert a space between the hashes and the heading text")
                    .fix(TextEdit::insert(line_start + hashes, " "))
                    .build(),
            );
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::check_rule;

    #[test]
    fn test_proper_heading_passes() {
        let diags = check_rule(&MD018, "# Heading\n## Another\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_space_flagged() {
        let diags = check_rule(&MD018, "#Heading\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_column, 2);
        assert_eq!(diags[0].fix_edits, vec![TextEdit::insert(1, " ")]);
    }

    #[test]
    fn test_deeper_level() {
        let diags = check_rule(&MD018, "###Deep\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].fix_edits, vec![TextEdit::insert(3, " ")]);
    }

    #[test]
    fn test_fence_content_ignored() {
        let diags = check_rule(&MD018, "```\n#not-a-heading\n```\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_seven_hashes_not_a_heading() {
        let diags = check_rule(&MD018, "#######x\n");
        assert!(diags.is_empty());
    }
}
