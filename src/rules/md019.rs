//! MD019 - Multiple spaces after hash on ATX style heading

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rules::{Rule, RuleContext, lines_outside_fences};
use crate::types::{Diagnostic, DiagnosticBuilder, Result, TextEdit};

static MULTIPLE_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})([ \t]{2,})\S").expect("valid regex"));

pub struct MD019;

impl Rule for MD019 {
    fn id(&self) -> &'static str {
        "MD019"
    }

    fn name(&self) -> &'static str {
        "no-multiple-space-atx"
    }

    fn description(&self) -> &'static str {
        "Multiple spaces after hash on atx style heading"
    }

    fn fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext) -> Result<Vec<Diagnostic>> {
        let snapshot = ctx.snapshot;
        let mut diagnostics = Vec::new();

        for (lineno, line) in lines_outside_fences(snapshot) {
            let Some(caps) = MULTIPLE_SPACES.captures(line) else {
                continue;
            };
            let hashes = caps[1].len();
            let spaces = caps[2].len();
            let (line_start, _) = snapshot.lines[lineno - 1];
            diagnostics.push(
                DiagnosticBuilder::new(self.id(), self.name(), "Multiple spaces after hash")
                    .at(lineno, hashes + 1, lineno, hashes + spaces + 1)
                    .suggestion("Use a single space after the hashes")
                    .fix(TextEdit::replace(
                        line_start + hashes,
                        line_start + hashes + spaces,
                        " ",
                    ))
                    .build(),
            );
        }

        Ok(diagnostics)
    }
}
