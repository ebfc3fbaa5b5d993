//! Per-file safety pipeline: read, parse, lint, plan, write with guards

use log::{debug, warn};
use std::collections::HashSet;
use std::path::Path;

use crate::cancel::CancelToken;
use crate::engine::{ResolvedRule, run_rules};
use crate::fix::plan_fixes;
use crate::fsio;
use crate::parser::{self, Flavor};
use crate::rules::Registry;
use crate::types::{PipelineResult, Result, SkipReason};

/// Fix-related behavior of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Markdown dialect to parse
    pub flavor: Flavor,
    /// Whether to apply fixes
    pub fix: bool,
    /// Compute the diff but leave the filesystem untouched
    pub dry_run: bool,
    /// Whether to create sidecar backups before writing
    pub backups: bool,
    /// Restrict fixing to these rule ids; `None` fixes everything fixable
    pub fix_rules: Option<HashSet<String>>,
}

/// The per-file pipeline. Holds the read-only registry and the resolved
/// rule set; one instance is shared by every worker in a run.
pub struct Pipeline<'a> {
    registry: &'a Registry,
    rules: &'a [ResolvedRule],
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    /// Build a pipeline over a registry and a resolved rule set.
    pub fn new(
        registry: &'a Registry,
        rules: &'a [ResolvedRule],
        options: PipelineOptions,
    ) -> Self {
        Self {
            registry,
            rules,
            options,
        }
    }

    /// Run the pipeline on one file.
    ///
    /// States: read, parse, lint, plan, then write, dry-run, or skip. The
    /// cancellation signal is checked at the boundary of every blocking
    /// step; writes are atomic-rename, so cancellation never leaves a
    /// half-written file.
    pub fn process(&self, cancel: &CancelToken, path: &Path) -> Result<PipelineResult> {
        cancel.check()?;
        let (content, info) = fsio::read_file(path)?;

        cancel.check()?;
        let snapshot = parser::parse(cancel, path, &content, self.options.flavor)?;

        cancel.check()?;
        let diagnostics = run_rules(self.registry, self.rules, &snapshot);

        let mut result = PipelineResult::lint_only(path.to_path_buf(), diagnostics);
        if !self.options.fix || result.diagnostics.iter().all(|d| d.fix_edits.is_empty()) {
            return Ok(result);
        }

        cancel.check()?;
        let plan = plan_fixes(
            path,
            &content,
            &result.diagnostics,
            self.options.fix_rules.as_ref(),
        );
        result.edits_dropped = plan.dropped;

        if plan.is_empty() || plan.fixed_content == content {
            return Ok(result);
        }

        if self.options.dry_run {
            result.diff = Some(plan.diff.clone());
            result.edits_applied = plan.applied;
            result.fix_plan = Some(plan);
            return Ok(result);
        }

        cancel.check()?;
        // Guard against external writers between our read and this write.
        if fsio::modified_since(&info)? {
            warn!(
                "skipping {}: changed on disk during linting",
                path.display()
            );
            result.skipped = true;
            result.skip_reason = Some(SkipReason::ConcurrentModification);
            return Ok(result);
        }

        if self.options.backups {
            fsio::create_backup(path)?;
        }
        fsio::atomic_write(path, &plan.fixed_content, info.mode)?;
        debug!(
            "fixed {} ({} edits applied, {} dropped)",
            path.display(),
            plan.applied,
            plan.dropped
        );

        result.written = true;
        result.diff = Some(plan.diff.clone());
        result.edits_applied = plan.applied;
        result.fix_plan = Some(plan);
        Ok(result)
    }
}
