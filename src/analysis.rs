//! Report aggregation over run results

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::types::{Diagnostic, RunResult, Severity, Stats};

/// How aggregate views are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Descending by issue count
    #[default]
    Count,
    /// Ascending, alphabetical, stable
    Alpha,
    /// Errors, then warnings, then infos, then issue count
    Severity,
}

/// Per-file aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// File path
    pub path: PathBuf,
    /// Error-severity diagnostics
    pub errors: usize,
    /// Warning-severity diagnostics
    pub warnings: usize,
    /// Info-severity diagnostics
    pub infos: usize,
    /// Rules that fired on this file
    pub rules: BTreeSet<String>,
}

impl FileSummary {
    /// Total diagnostics on this file.
    pub fn count(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Per-rule aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    /// Rule id
    pub rule_id: String,
    /// Rule name
    pub rule_name: String,
    /// Error-severity diagnostics
    pub errors: usize,
    /// Warning-severity diagnostics
    pub warnings: usize,
    /// Info-severity diagnostics
    pub infos: usize,
    /// Files this rule fired on
    pub files: BTreeSet<PathBuf>,
}

impl RuleSummary {
    /// Total diagnostics from this rule.
    pub fn count(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Renderable view over a run: flat diagnostics plus per-file and per-rule
/// aggregates and totals.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Every diagnostic, in file order then position order
    pub diagnostics: Vec<Diagnostic>,
    /// Per-file aggregation, in run order until re-sorted
    pub files: Vec<FileSummary>,
    /// Per-rule aggregation
    pub rules: Vec<RuleSummary>,
    /// Aggregate statistics carried over from the run
    pub totals: Stats,
}

impl Report {
    /// Build a report from a run result in a single traversal.
    pub fn from_run(run: &RunResult) -> Self {
        let mut diagnostics = Vec::new();
        let mut files: IndexMap<PathBuf, FileSummary> = IndexMap::new();
        let mut rules: IndexMap<String, RuleSummary> = IndexMap::new();

        for outcome in &run.files {
            let Some(result) = &outcome.result else {
                continue;
            };
            for diagnostic in &result.diagnostics {
                let file = files
                    .entry(outcome.path.clone())
                    .or_insert_with(|| FileSummary {
                        path: outcome.path.clone(),
                        errors: 0,
                        warnings: 0,
                        infos: 0,
                        rules: BTreeSet::new(),
                    });
                let rule = rules
                    .entry(diagnostic.rule_id.clone())
                    .or_insert_with(|| RuleSummary {
                        rule_id: diagnostic.rule_id.clone(),
                        rule_name: diagnostic.rule_name.clone(),
                        errors: 0,
                        warnings: 0,
                        infos: 0,
                        files: BTreeSet::new(),
                    });
                match diagnostic.severity {
                    Severity::Error => {
                        file.errors += 1;
                        rule.errors += 1;
                    }
                    Severity::Warning => {
                        file.warnings += 1;
                        rule.warnings += 1;
                    }
                    Severity::Info => {
                        file.infos += 1;
                        rule.infos += 1;
                    }
                }
                file.rules.insert(diagnostic.rule_id.clone());
                rule.files.insert(outcome.path.clone());
                diagnostics.push(diagnostic.clone());
            }
        }

        Report {
            diagnostics,
            files: files.into_values().collect(),
            rules: rules.into_values().collect(),
            totals: run.stats.clone(),
        }
    }

    /// Sort the per-file view.
    pub fn sort_files(&mut self, mode: SortMode) {
        match mode {
            SortMode::Count => self.files.sort_by(|a, b| b.count().cmp(&a.count())),
            SortMode::Alpha => self.files.sort_by(|a, b| a.path.cmp(&b.path)),
            SortMode::Severity => self.files.sort_by(|a, b| {
                (b.errors, b.warnings, b.infos, b.count()).cmp(&(
                    a.errors,
                    a.warnings,
                    a.infos,
                    a.count(),
                ))
            }),
        }
    }

    /// Sort the per-rule view.
    pub fn sort_rules(&mut self, mode: SortMode) {
        match mode {
            SortMode::Count => self.rules.sort_by(|a, b| b.count().cmp(&a.count())),
            SortMode::Alpha => self.rules.sort_by(|a, b| a.rule_id.cmp(&b.rule_id)),
            SortMode::Severity => self.rules.sort_by(|a, b| {
                (b.errors, b.warnings, b.infos, b.count()).cmp(&(
                    a.errors,
                    a.warnings,
                    a.infos,
                    a.count(),
                ))
            }),
        }
    }
}
