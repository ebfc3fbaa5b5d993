//! Fix planning: conflict detection, edit application, and diff output

use log::warn;
use similar::TextDiff;
use std::collections::HashSet;
use std::path::Path;

use crate::types::{Diagnostic, TextEdit};

/// The conflict-resolved, ordered set of edits actually applied to a file.
///
/// Constructed, validated, and then either applied or discarded within a
/// single pipeline invocation; never shared across files.
#[derive(Debug, Clone)]
pub struct FixPlan {
    /// Applied edits, sorted by start offset, pairwise non-overlapping
    pub edits: Vec<TextEdit>,
    /// Content after applying the edits
    pub fixed_content: String,
    /// Unified diff from the original to the fixed content
    pub diff: String,
    /// Number of edits applied
    pub applied: usize,
    /// Number of edits dropped because they conflicted with an earlier edit
    pub dropped: usize,
}

impl FixPlan {
    /// Whether the plan changes anything.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Build a fix plan from the diagnostics of one file.
///
/// `allow` restricts fixing to the given rule ids; `None` permits every
/// fixable diagnostic. Edits are sorted by `(start, end)` with insertion
/// order breaking ties; within a group of overlapping edits the first in
/// sorted order wins and the rest are dropped.
pub fn plan_fixes(
    path: &Path,
    content: &str,
    diagnostics: &[Diagnostic],
    allow: Option<&HashSet<String>>,
) -> FixPlan {
    let mut edits: Vec<(TextEdit, String)> = Vec::new();
    for diagnostic in diagnostics {
        if let Some(allow) = allow
            && !allow.contains(&diagnostic.rule_id)
        {
            continue;
        }
        for edit in &diagnostic.fix_edits {
            edits.push((edit.clone(), diagnostic.rule_id.clone()));
        }
    }

    // Stable sort keeps collection order for equal (start, end) keys.
    edits.sort_by_key(|(edit, _)| (edit.start, edit.end));

    let mut kept: Vec<TextEdit> = Vec::with_capacity(edits.len());
    let mut dropped = 0;
    let mut last_end = 0;
    for (edit, rule_id) in edits {
        if !kept.is_empty() && edit.start < last_end {
            warn!(
                "dropping conflicting fix from {rule_id} at {}..{} in {}",
                edit.start,
                edit.end,
                path.display()
            );
            dropped += 1;
            continue;
        }
        last_end = edit.end;
        kept.push(edit);
    }

    let fixed_content = apply_edits(content, &kept);
    let diff = if fixed_content == content {
        String::new()
    } else {
        unified_diff(path, content, &fixed_content)
    };

    FixPlan {
        applied: kept.len(),
        edits: kept,
        fixed_content,
        diff,
        dropped,
    }
}

/// Apply sorted, non-overlapping edits to `content`.
///
/// Application walks right to left so earlier offsets stay valid.
pub fn apply_edits(content: &str, edits: &[TextEdit]) -> String {
    debug_assert!(edits.windows(2).all(|w| !w[0].overlaps(&w[1])));
    let mut fixed = content.to_string();
    for edit in edits.iter().rev() {
        fixed.replace_range(edit.start..edit.end, &edit.replacement);
    }
    fixed
}

/// Unified diff with three lines of context and `a/<path>` / `b/<path>`
/// headers. Fixing never creates or deletes files, so creation/deletion
/// paths are not used.
pub fn unified_diff(path: &Path, original: &str, fixed: &str) -> String {
    let display = path.display().to_string();
    TextDiff::from_lines(original, fixed)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{display}"), &format!("b/{display}"))
        .to_string()
}
