//! MD025 - Multiple top-level headings in the same document

use crate::parser::{NodeKind, Walk};
use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result};

pub struct MD025;

impl Rule for MD025 {
    fn id(&self) -> &'static str {
        "MD025"
    }

    fn name(&self) -> &'static str {
        "single-title"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["single-h1"]
    }

    fn description(&self) -> &'static str {
        "Multiple top-level headings in the same document"
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let top_level = ctx.opt_usize("level", 1) as u8;
        let mut diagnostics = Vec::new();
        let mut seen_title = false;

        snapshot.walk(|id, node| {
            if let NodeKind::Heading { level } = node.kind {
                if level == top_level {
                    if seen_title {
                        let (line, column) = snapshot
                            .node_span(id)
                            .map(|(start, _)| snapshot.position_of(start))
                            .unwrap_or((1, 1));
                        diagnostics.push(
                            DiagnosticBuilder::new(
                                self.id(),
                                self.name(),
                                format!("Multiple level {top_level} headings"),
                            )
                            .at(line, column, line, column + 1)
                            .suggestion("Demote the extra top-level heading")
                            .build(),
                        );
                    }
                    seen_title = true;
                }
                return Walk::SkipChildren;
            }
            Walk::Continue
        });

        Ok(diagnostics)
    }
}
