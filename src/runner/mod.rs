//! Multi-file runner: discovery, worker pool, deterministic assembly

mod discovery;

pub use discovery::{DiscoveryOptions, discover_files, normalize};

use crossbeam_channel::{bounded, unbounded};
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;

use crate::cancel::CancelToken;
use crate::engine::ResolvedRule;
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::rules::Registry;
use crate::types::{Error, FileOutcome, RunResult};

/// Output of a run: the (possibly partial) result plus the whole-run error,
/// if any. Per-file errors live inside the result; `error` is set for
/// run-level failures such as cancellation.
#[derive(Debug)]
pub struct RunOutput {
    /// Deterministic result assembled so far
    pub result: RunResult,
    /// Whole-run error, when the run aborted early
    pub error: Option<Error>,
}

/// The multi-file orchestrator. Owns the worker count; borrows the
/// read-only registry and resolved rule set shared by all workers.
pub struct Runner<'a> {
    registry: &'a Registry,
    rules: &'a [ResolvedRule],
    pipeline_options: PipelineOptions,
    jobs: usize,
}

impl<'a> Runner<'a> {
    /// Build a runner. `jobs = 0` selects the number of hardware threads.
    pub fn new(
        registry: &'a Registry,
        rules: &'a [ResolvedRule],
        pipeline_options: PipelineOptions,
        jobs: usize,
    ) -> Self {
        let jobs = if jobs == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            jobs
        };
        Self {
            registry,
            rules,
            pipeline_options,
            jobs,
        }
    }

    /// Process `files` (already discovered) through the safety pipeline.
    ///
    /// A producer feeds paths to `jobs` workers over a channel; a collector
    /// drains outcomes into a path-keyed map; the final result is emitted in
    /// the order of `files`, independent of scheduling. Under cancellation
    /// the partial result assembled so far is returned together with
    /// `Error::Cancelled`; outcomes of unfinished files are discarded.
    pub fn run(&self, files: &[PathBuf], cancel: &CancelToken) -> RunOutput {
        let worker_count = self.jobs.min(files.len()).max(1);
        let pipeline = Pipeline::new(self.registry, self.rules, self.pipeline_options.clone());

        let (work_tx, work_rx) = bounded::<PathBuf>(worker_count * 2);
        let (outcome_tx, outcome_rx) = unbounded::<FileOutcome>();

        let mut collected: HashMap<PathBuf, FileOutcome> = HashMap::with_capacity(files.len());

        thread::scope(|scope| {
            scope.spawn(|| {
                for path in files {
                    if cancel.is_cancelled() {
                        break;
                    }
                    if work_tx.send(path.clone()).is_err() {
                        break;
                    }
                }
                drop(work_tx);
            });

            for _ in 0..worker_count {
                let work_rx = work_rx.clone();
                let outcome_tx = outcome_tx.clone();
                let pipeline = &pipeline;
                scope.spawn(move || {
                    while let Ok(path) = work_rx.recv() {
                        if cancel.is_cancelled() {
                            break;
                        }
                        let outcome = match pipeline.process(cancel, &path) {
                            Ok(result) => FileOutcome::ok(result),
                            // In-flight work for a cancelled run is discarded.
                            Err(Error::Cancelled) => break,
                            Err(err) => FileOutcome::err(path, err),
                        };
                        if outcome_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(work_rx);
            drop(outcome_tx);

            for outcome in outcome_rx {
                collected.insert(outcome.path.clone(), outcome);
            }
        });

        // Deterministic assembly: input order, not completion order.
        let mut result = RunResult::default();
        for path in files {
            if let Some(outcome) = collected.remove(path) {
                result.files.push(outcome);
            }
        }
        let result = result.finalize();
        debug!(
            "processed {} of {} files ({} with issues)",
            result.stats.files_processed,
            files.len(),
            result.stats.files_with_issues
        );

        let error = cancel.is_cancelled().then_some(Error::Cancelled);
        RunOutput { result, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use std::fs;

    fn resolved(ids: &[&str]) -> Vec<ResolvedRule> {
        ids.iter()
            .map(|id| ResolvedRule {
                id: id.to_string(),
                severity: Severity::Warning,
                options: serde_json::Value::Null,
            })
            .collect()
    }

    fn make_files(dir: &tempfile::TempDir, names: &[&str]) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for name in names {
            let path = dir.path().join(name);
            fs::write(&path, "# Title   \n").unwrap();
            paths.push(path);
        }
        paths.sort();
        paths
    }

    #[test]
    fn test_outcomes_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = make_files(&dir, &["z.md", "a.md", "m.md"]);
        let registry = Registry::with_builtin_rules();
        let rules = resolved(&["MD009"]);
        let runner = Runner::new(&registry, &rules, PipelineOptions::default(), 4);

        for _ in 0..5 {
            let output = runner.run(&files, &CancelToken::new());
            assert!(output.error.is_none());
            let got: Vec<_> = output.result.files.iter().map(|f| f.path.clone()).collect();
            assert_eq!(got, files);
        }
    }

    #[test]
    fn test_per_file_error_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = make_files(&dir, &["a.md", "c.md"]);
        files.insert(1, dir.path().join("b.md")); // never created

        let registry = Registry::with_builtin_rules();
        let rules = resolved(&["MD009"]);
        let runner = Runner::new(&registry, &rules, PipelineOptions::default(), 2);

        let output = runner.run(&files, &CancelToken::new());
        assert!(output.error.is_none());
        assert_eq!(output.result.files.len(), 3);
        assert!(output.result.files[1].error.is_some());
        assert!(output.result.files[0].result.is_some());
        assert!(output.result.files[2].result.is_some());
        assert_eq!(output.result.stats.files_errored, 1);
    }

    #[test]
    fn test_stats_aggregation() {
        let dir = tempfile::tempdir().unwrap();
        let files = make_files(&dir, &["a.md", "b.md"]);
        let registry = Registry::with_builtin_rules();
        let rules = resolved(&["MD009"]);
        let runner = Runner::new(&registry, &rules, PipelineOptions::default(), 2);

        let output = runner.run(&files, &CancelToken::new());
        assert_eq!(output.result.stats.files_processed, 2);
        assert_eq!(output.result.stats.files_with_issues, 2);
        assert_eq!(output.result.stats.warnings, 2);
        assert_eq!(output.result.stats.fixable, 2);
    }

    #[test]
    fn test_cancelled_run_returns_partial_with_error() {
        let dir = tempfile::tempdir().unwrap();
        let files = make_files(&dir, &["a.md", "b.md", "c.md"]);
        let registry = Registry::with_builtin_rules();
        let rules = resolved(&["MD009"]);
        let runner = Runner::new(&registry, &rules, PipelineOptions::default(), 2);

        let cancel = CancelToken::new();
        cancel.cancel();
        let output = runner.run(&files, &cancel);
        assert!(matches!(output.error, Some(Error::Cancelled)));
        assert!(output.result.files.len() <= files.len());
    }

    #[test]
    fn test_empty_file_list() {
        let registry = Registry::with_builtin_rules();
        let rules = resolved(&["MD009"]);
        let runner = Runner::new(&registry, &rules, PipelineOptions::default(), 2);

        let output = runner.run(&[], &CancelToken::new());
        assert!(output.error.is_none());
        assert!(output.result.files.is_empty());
        assert_eq!(output.result.stats.files_processed, 0);
    }

    #[test]
    fn test_single_worker_matches_parallel() {
        let dir = tempfile::tempdir().unwrap();
        let files = make_files(&dir, &["a.md", "b.md", "c.md", "d.md"]);
        let registry = Registry::with_builtin_rules();
        let rules = resolved(&["MD009"]);

        let serial = Runner::new(&registry, &rules, PipelineOptions::default(), 1)
            .run(&files, &CancelToken::new());
        let parallel = Runner::new(&registry, &rules, PipelineOptions::default(), 4)
            .run(&files, &CancelToken::new());

        let serial_paths: Vec<_> = serial.result.files.iter().map(|f| &f.path).collect();
        let parallel_paths: Vec<_> = parallel.result.files.iter().map(|f| &f.path).collect();
        assert_eq!(serial_paths, parallel_paths);
        assert_eq!(serial.result.stats, parallel.result.stats);
    }
}
