//! MD010 - Hard tabs

use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

pub struct MD010;

impl Rule for MD010 {
    fn id(&self) -> &'static str {
        "MD010"
    }

    fn name(&self) -> &'static str {
        "no-hard-tabs"
    }

    fn description(&self) -> &'static str {
        "Hard tabs"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let spaces_per_tab = ctx.opt_usize("spaces_per_tab", 4);
        let mut diagnostics = Vec::new();

        for lineno in 1..=snapshot.line_count() {
            let Some(line) = snapshot.line_without_ending(lineno) else {
                continue;
            };
            let Some(first_tab) = line.find('\t') else {
                continue;
            };

            let (line_start, _) = snapshot.lines[lineno - 1];
            let tab_count = line.bytes().filter(|&b| b == b'\t').count();
            let mut builder = DiagnosticBuilder::new(
                self.id(),
                self.name(),
                format!("Hard tabs found: {tab_count}"),
            )
            .at(lineno, first_tab + 1, lineno, first_tab + 2)
            .suggestion("Replace hard tabs with spaces");

            for (pos, byte) in line.bytes().enumerate() {
                if byte == b'\t' {
                    builder = builder.fix(TextEdit::replace(
                        line_start + pos,
                        line_start + pos + 1,
                        " ".repeat(spaces_per_tab),
                    ));
                }
            }
            diagnostics.push(builder.build());
        }

        Ok(diagnostics)
    }
}
