//! MD009 - Trailing spaces

use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

pub struct MD009;

impl Rule for MD009 {
    fn id(&self) -> &'static str {
        "MD009"
    }

    fn name(&self) -> &'static str {
        "no-trailing-spaces"
    }

    fn description(&self) -> &'static str {
        "Trailing spaces"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let mut diagnostics = Vec::new();

        for lineno in 1..=snapshot.line_count() {
            let Some(line) = snapshot.line_without_ending(lineno) else {
                continue;
            };
            if !line.ends_with([' ', '\t']) {
                continue;
            }

            let kept = line.trim_end_matches([' ', '\t']).len();
            let trailing = line.len() - kept;
            let (line_start, _) = snapshot.lines[lineno - 1];

            diagnostics.push(
                DiagnosticBuilder::new(
                    self.id(),
                    self.name(),
                    format!("Expected: 0 trailing characters; Actual: {trailing}"),
                )
                .at(lineno, kept + 1, lineno, line.len() + 1)
                .suggestion("Remove trailing whitespace")
                .fix(TextEdit::delete(line_start + kept, line_start + line.len()))
                .build(),
            );
        }

        Ok(diagnostics)
    }
}
