//! MD022 - Headings should be surrounded by blank lines

use crate::parser::{NodeKind, Walk};
use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

pub struct MD022;

impl Rule for MD022 {
    fn id(&self) -> &'static str {
        "MD022"
    }

    fn name(&self) -> &'static str {
        "blanks-around-headings"
    }

    fn description(&self) -> &'static str {
        "Headings should be surrounded by blank lines"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let mut diagnostics = Vec::new();

        snapshot.walk(|id, node| {
            let NodeKind::Heading { .. } = node.kind else {
                return Walk::Continue;
            };
            // Only top-level headings; headings inside blockquotes share
            // lines with their container and are left alone.
            if node.parent != Some(snapshot.root()) {
                return Walk::SkipChildren;
            }
            let Some((start, end)) = snapshot.node_span(id) else {
                return Walk::SkipChildren;
            };
            let (start_line, start_column) = snapshot.position_of(start);
            let (end_line, _) = snapshot.position_of(end.saturating_sub(1));

            let blank_above = start_line == 1
                || snapshot
                    .line_without_ending(start_line - 1)
                    .is_some_and(|l| l.trim().is_empty());
            if !blank_above {
                let line_start = snapshot.lines[start_line - 1].0;
                diagnostics.push(
                    DiagnosticBuilder::new(self.id(), self.name(), "No blank line above heading")
                        .at(start_line, start_column, start_line, start_column + 1)
                        .suggestion("Add a blank line before the heading")
                        .fix(TextEdit::insert(line_start, "\n"))
                        .build(),
                );
            }

            let blank_below = end_line == snapshot.line_count()
                || snapshot
                    .line_without_ending(end_line + 1)
                    .is_none_or(|l| l.trim().is_empty());
            if !blank_below {
                let line_end = snapshot.lines[end_line - 1].1;
                diagnostics.push(
                    DiagnosticBuilder::new(self.id(), self.name(), "No blank line below heading")
                        .at(end_line, 1, end_line, 2)
                        .suggestion("Add a blank line after the heading")
                        .fix(TextEdit::insert(line_end, "\n"))
                        .build(),
                );
            }
            Walk::SkipChildren
        });

        Ok(diagnostics)
    }
}
