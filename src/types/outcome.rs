//! Per-file and whole-run result types

use crate::fix::FixPlan;
use crate::types::{Diagnostic, Error, Severity};
use serde::Serialize;
use std::path::PathBuf;

/// Why a file was skipped instead of written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The file changed on disk between read and write-back
    ConcurrentModification,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ConcurrentModification => write!(f, "concurrent modification"),
        }
    }
}

/// Result of running the safety pipeline over a single file
#[derive(Debug)]
pub struct PipelineResult {
    /// File the pipeline ran on
    pub path: PathBuf,

    /// Diagnostics, sorted by (line, column, rule id)
    pub diagnostics: Vec<Diagnostic>,

    /// The fix plan, when fixing was requested and edits existed
    pub fix_plan: Option<FixPlan>,

    /// Unified diff against the original content (fix or dry-run)
    pub diff: Option<String>,

    /// Whether the file was rewritten on disk
    pub written: bool,

    /// Whether a planned write was skipped
    pub skipped: bool,

    /// Reason for the skip, when `skipped`
    pub skip_reason: Option<SkipReason>,

    /// Number of edits actually applied
    pub edits_applied: usize,

    /// Number of edits dropped due to conflicts
    pub edits_dropped: usize,
}

impl PipelineResult {
    /// A diagnostics-only result with no fix activity.
    pub fn lint_only(path: PathBuf, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path,
            diagnostics,
            fix_plan: None,
            diff: None,
            written: false,
            skipped: false,
            skip_reason: None,
            edits_applied: 0,
            edits_dropped: 0,
        }
    }
}

/// Per-file outcome inside a run: either a pipeline result or an error.
#[derive(Debug)]
pub struct FileOutcome {
    /// File this outcome belongs to
    pub path: PathBuf,
    /// Pipeline result on success
    pub result: Option<PipelineResult>,
    /// Per-file error on failure
    pub error: Option<Error>,
}

impl FileOutcome {
    /// Successful outcome.
    pub fn ok(result: PipelineResult) -> Self {
        Self {
            path: result.path.clone(),
            result: Some(result),
            error: None,
        }
    }

    /// Failed outcome.
    pub fn err(path: PathBuf, error: Error) -> Self {
        Self {
            path,
            result: None,
            error: Some(error),
        }
    }
}

/// Aggregate statistics for a run, computed in a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Files that completed the pipeline (successfully or with a per-file error)
    pub files_processed: usize,
    /// Files with at least one diagnostic
    pub files_with_issues: usize,
    /// Files rewritten on disk
    pub files_modified: usize,
    /// Files that errored
    pub files_errored: usize,
    /// Error-severity diagnostics
    pub errors: usize,
    /// Warning-severity diagnostics
    pub warnings: usize,
    /// Info-severity diagnostics
    pub infos: usize,
    /// Diagnostics carrying at least one fix edit
    pub fixable: usize,
    /// Edits applied across all files
    pub edits_applied: usize,
    /// Edits dropped due to conflicts across all files
    pub edits_dropped: usize,
}

impl Stats {
    /// Total diagnostics of any severity.
    pub fn total_diagnostics(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Result of a multi-file run.
///
/// `files` is ordered exactly as discovery returned the paths, independent of
/// worker scheduling.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Per-file outcomes in discovery order
    pub files: Vec<FileOutcome>,
    /// Aggregate statistics
    pub stats: Stats,
}

impl RunResult {
    /// Compute statistics over the collected outcomes.
    pub fn finalize(mut self) -> Self {
        let mut stats = Stats::default();
        for outcome in &self.files {
            stats.files_processed += 1;
            match (&outcome.result, &outcome.error) {
                (Some(result), _) => {
                    if !result.diagnostics.is_empty() {
                        stats.files_with_issues += 1;
                    }
                    if result.written {
                        stats.files_modified += 1;
                    }
                    stats.edits_applied += result.edits_applied;
                    stats.edits_dropped += result.edits_dropped;
                    for diag in &result.diagnostics {
                        match diag.severity {
                            Severity::Error => stats.errors += 1,
                            Severity::Warning => stats.warnings += 1,
                            Severity::Info => stats.infos += 1,
                        }
                        if diag.is_fixable() {
                            stats.fixable += 1;
                        }
                    }
                }
                (None, Some(_)) => stats.files_errored += 1,
                (None, None) => {}
            }
        }
        self.stats = stats;
        self
    }

    /// Whether any diagnostic of the given severity exists.
    pub fn has_severity(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => self.stats.errors > 0,
            Severity::Warning => self.stats.warnings > 0,
            Severity::Info => self.stats.infos > 0,
        }
    }
}
