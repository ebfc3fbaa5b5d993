//! MD040 - Fenced code blocks should have a language

use crate::parser::{NodeKind, Walk};
use crate::rules::{Rule, RuleContext};
use crate::types::{Diagnostic, DiagnosticBuilder, Result};

pub struct MD040;

impl Rule for MD040 {
    fn id(&self) -> &'static str {
        "MD040"
    }

    fn name(&self) -> &'static str {
        "fenced-code-language"
    }

    fn description(&self) -> &'static str {
        "Fenced code blocks should have a language specified"
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let mut diagnostics = Vec::new();

        snapshot.walk(|id, node| {
            if let NodeKind::CodeBlock { fenced, info, .. } = &node.kind {
                if *fenced && info.is_empty() {
                    let (line, column) = snapshot
                        .node_span(id)
                        .map(|(start, _)| snapshot.position_of(start))
                        .unwrap_or((1, 1));
                    diagnostics.push(
                        DiagnosticBuilder::new(
                            self.id(),
                            self.name(),
                            "Fenced code block without language",
                        )
                        .at(line, column, line, column + 3)
                        .suggestion("Add a language identifier after the opening fence")
                        .build(),
                    );
                }
                return Walk::SkipChildren;
            }
            Walk::Continue
        });

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::check_rule;

    #[test]
    fn test_language_present_passes() {
        let diags = check_rule(&MD040, "```rust\nfn x() {}\n```\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_missing_language_flagged() {
        let diags = check_rule(&MD040, "```\ncode\n```\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_line, 1);
    }

    #[test]
    fn test_indented_block_ignored() {
        let diags = check_rule(&MD040, "    indented code\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_position_of_second_block() {
        let diags = check_rule(&MD040, "```rust\nok\n```\n\n```\nbad\n```\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].start_line, 5);
    }
}
