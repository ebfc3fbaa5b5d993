//! MD047 - Files should end with a single newline character

use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

pub struct MD047;

impl Rule for MD047 {
    fn id(&self) -> &'static str {
        "MD047"
    }

    fn name(&self) -> &'static str {
        "single-trailing-newline"
    }

    fn description(&self) -> &'static str {
        "Files should end with a single newline character"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let content = &snapshot.content;
        if content.is_empty() || content.ends_with('\n') {
            return Ok(Vec::new());
        }

        let last_line = snapshot.line_count();
        let line_len = snapshot
            .line_without_ending(last_line)
            .map_or(1, |l| l.len());
        Ok(vec![
            DiagnosticBuilder::new(self.id(), self.name(), "Missing trailing newline")
                .at(last_line, line_len + 1, last_line, line_len + 1)
                .suggestion("End the file with a single newline")
                .fix(TextEdit::insert(content.len(), "\n"))
                .build(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::check_rule;

    #[test]
    fn test_trailing_newline_passes() {
        let diags = check_rule(&MD047, "# Title\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_newline_flagged() {
        let diags = check_rule(&MD047, "# Title");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_line, 1);
        assert_eq!(diags[0].start_column, 8);
        assert_eq!(diags[0].fix_edits, vec![TextEdit::insert(7, "\n")]);
    }

    #[test]
    fn test_empty_file_passes() {
        let diags = check_rule(&MD047, "");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_fix_roundtrip() {
        let content = "text";
        let diags = check_rule(&MD047, content);
        let edit = &diags[0].fix_edits[0];
        let mut fixed = content.to_string();
        fixed.insert_str(edit.start, &edit.replacement);
        assert_eq!(fixed, "text\n");
    }
}
