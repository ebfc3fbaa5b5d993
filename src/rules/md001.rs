//! MD001 - Heading levels should only increment by one level at a time

use crate::parser::{NodeKind, Walk};
use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, Severity};

pub struct MD001;

impl Rule for MD001 {
    fn id(&self) -> &'static str {
        "MD001"
    }

    fn name(&self) -> &'static str {
        "heading-increment"
    }

    fn description(&self) -> &'static str {
        "Heading levels should only increment by one level at a time"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let mut diagnostics = Vec::new();
        let mut prev_level: Option<u8> = None;

        snapshot.walk(|id, node| {
            if let NodeKind::Heading { level } = node.kind {
                if let Some(prev) = prev_level
                    && level > prev + 1
                {
                    let (line, column) = snapshot
                        .node_span(id)
                        .map(|(start, _)| snapshot.position_of(start))
                        .unwrap_or((1, 1));
                    diagnostics.push(
                        DiagnosticBuilder::new(
                            self.id(),
                            self.name(),
                            format!("Expected h{}, found h{}", prev + 1, level),
                        )
                        .at(line, column, line, column + 1)
                        .build(),
                    );
                }
                prev_level = Some(level);
                return Walk::SkipChildren;
            }
            Walk::Continue
        });

        Ok(diagnostics)
    }
}
