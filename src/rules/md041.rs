//! MD041 - First line in a file should be a top-level heading

use crate::parser::NodeKind;
use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, Severity};

pub struct MD041;

impl Rule for MD041 {
    fn id(&self) -> &'static str {
        "MD041"
    }

    fn name(&self) -> &'static str {
        "first-line-heading"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["first-line-h1"]
    }

    fn description(&self) -> &'static str {
        "First line in a file should be a top-level heading"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let expected = ctx.opt_usize("level", 1) as u8;

        let Some(first) = snapshot.children(snapshot.root()).next() else {
            return Ok(Vec::new());
        };

        let ok = matches!(snapshot.node(first).kind, NodeKind::Heading { level } if level == expected);
        if ok {
            return Ok(Vec::new());
        }

        let (line, column) = snapshot
            .node_span(first)
            .map(|(start, _)| snapshot.position_of(start))
            .unwrap_or((1, 1));
        Ok(vec![
            DiagnosticBuilder::new(
                self.id(),
                self.name(),
                format!("First content should be a level {expected} heading"),
            )
            .at(line, column, line, column + 1)
            .build(),
        ])
    }
}
