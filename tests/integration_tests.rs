//! Integration tests for mdguard

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use mdguard::cancel::CancelToken;
use mdguard::config::{Config, RuleOverride, resolve_rules};
use mdguard::engine::ResolvedRule;
use mdguard::pipeline::{Pipeline, PipelineOptions};
use mdguard::rules::{Registry, Rule, RuleContext};
use mdguard::runner::{DiscoveryOptions, Runner, discover_files};
use mdguard::types::{
    Diagnostic, DiagnosticBuilder, Result as MdResult, Severity, SkipReason, TextEdit,
};

fn resolved(ids: &[&str]) -> Vec<ResolvedRule> {
    ids.iter()
        .map(|id| ResolvedRule {
            id: id.to_string(),
            severity: Severity::Warning,
            options: serde_json::Value::Null,
        })
        .collect()
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ---- Scenario: trailing-space diagnostic ----

#[test]
fn trailing_space_diagnostic_without_fix() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.md", "# Hello   \n\nSome text.\n");
    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD009"]);
    let pipeline = Pipeline::new(&registry, &rules, PipelineOptions::default());

    let result = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert_eq!(result.diagnostics.len(), 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.start_line, 1);
    assert_eq!(diag.start_column, 8);
    assert_eq!(diag.rule_id, "MD009");
    assert!(!result.written);
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Hello   \n\nSome text.\n");
}

#[test]
fn trailing_space_fixed_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.md", "# Hello   \n\nSome text.\n");
    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD009"]);
    let options = PipelineOptions {
        fix: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    let result = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert!(result.written);
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Hello\n\nSome text.\n");
}

// ---- Scenario: dry-run diff ----

#[test]
fn dry_run_attaches_diff_and_leaves_disk_alone() {
    let dir = tempfile::tempdir().unwrap();
    let original = "# Hello   \n\nSome text.\n";
    let path = write_file(&dir, "a.md", original);
    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD009"]);
    let options = PipelineOptions {
        fix: true,
        dry_run: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    let result = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert!(!result.written);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    let diff = result.diff.expect("diff attached");
    let minus: Vec<_> = diff
        .lines()
        .filter(|l| l.starts_with('-') && !l.starts_with("---"))
        .collect();
    let plus: Vec<_> = diff
        .lines()
        .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
        .collect();
    assert_eq!(minus, vec!["-# Hello   "]);
    assert_eq!(plus, vec!["+# Hello"]);
}

// ---- Scenario: concurrent modification ----

/// Simulates an external writer by rewriting the file during rule execution,
/// which happens after the pipeline's read and before its write-back.
struct ExternalWriter;

impl Rule for ExternalWriter {
    fn id(&self) -> &'static str {
        "TX001"
    }
    fn name(&self) -> &'static str {
        "external-writer"
    }
    fn description(&self) -> &'static str {
        "rewrites the file mid-lint"
    }
    fn fixable(&self) -> bool {
        true
    }
    fn check(&self, ctx: &RuleContext) -> MdResult<Vec<Diagnostic>> {
        fs::write(&ctx.snapshot.path, "someone else was here\n").unwrap();
        Ok(vec![
            DiagnosticBuilder::new("TX001", "external-writer", "needs fixing")
                .at(1, 1, 1, 2)
                .fix(TextEdit::replace(0, 1, "Y"))
                .build(),
        ])
    }
}

#[test]
fn concurrent_modification_skips_and_preserves_external_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.md", "x\n");
    let mut registry = Registry::new();
    registry.register(Arc::new(ExternalWriter)).unwrap();
    let rules = resolved(&["TX001"]);
    let options = PipelineOptions {
        fix: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    let result = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert!(result.skipped);
    assert_eq!(result.skip_reason, Some(SkipReason::ConcurrentModification));
    assert!(!result.written);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "someone else was here\n"
    );
}

// ---- Scenario: deterministic multi-file order ----

#[test]
fn multi_file_order_is_discovery_order_across_repetitions() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["z.md", "a.md", "m.md"] {
        write_file(&dir, name, "# Title   \n");
    }
    let discovery = DiscoveryOptions {
        cwd: dir.path().to_path_buf(),
        ..Default::default()
    };
    let files = discover_files(&[dir.path().to_path_buf()], &discovery).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.md", "m.md", "z.md"]);

    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD009"]);
    let runner = Runner::new(&registry, &rules, PipelineOptions::default(), 4);
    for _ in 0..5 {
        let output = runner.run(&files, &CancelToken::new());
        let got: Vec<_> = output.result.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(got, files);
        assert_eq!(output.result.stats.files_with_issues, 3);
    }
}

// ---- Scenario: rule configured by id and name ----

#[test]
fn duplicate_id_and_name_config_later_wins_with_warning() {
    let registry = Registry::with_builtin_rules();
    let mut config = Config::new();
    config
        .rules
        .insert("MD009".to_string(), RuleOverride::Enabled(false));
    config.rules.insert(
        "no-trailing-spaces".to_string(),
        RuleOverride::Enabled(true),
    );

    let resolution = resolve_rules(&registry, &config).unwrap();
    assert!(resolution.rules.iter().any(|r| r.id == "MD009"));
    assert_eq!(resolution.warnings.len(), 1);
}

// ---- Scenario: overlapping fixes from two rules ----

struct EarlyEdit;

impl Rule for EarlyEdit {
    fn id(&self) -> &'static str {
        "TX101"
    }
    fn name(&self) -> &'static str {
        "early-edit"
    }
    fn description(&self) -> &'static str {
        "edits bytes 3..7"
    }
    fn fixable(&self) -> bool {
        true
    }
    fn check(&self, _ctx: &RuleContext) -> MdResult<Vec<Diagnostic>> {
        Ok(vec![
            DiagnosticBuilder::new("TX101", "early-edit", "replace 3..7")
                .at(1, 4, 1, 8)
                .fix(TextEdit::replace(3, 7, "x"))
                .build(),
        ])
    }
}

struct LateEdit;

impl Rule for LateEdit {
    fn id(&self) -> &'static str {
        "TX102"
    }
    fn name(&self) -> &'static str {
        "late-edit"
    }
    fn description(&self) -> &'static str {
        "edits bytes 5..9"
    }
    fn fixable(&self) -> bool {
        true
    }
    fn check(&self, _ctx: &RuleContext) -> MdResult<Vec<Diagnostic>> {
        Ok(vec![
            DiagnosticBuilder::new("TX102", "late-edit", "replace 5..9")
                .at(1, 6, 1, 10)
                .fix(TextEdit::replace(5, 9, "y"))
                .build(),
        ])
    }
}

#[test]
fn overlapping_fixes_first_edit_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.md", "0123456789\n");
    let mut registry = Registry::new();
    registry.register(Arc::new(EarlyEdit)).unwrap();
    registry.register(Arc::new(LateEdit)).unwrap();
    let rules = resolved(&["TX101", "TX102"]);
    let options = PipelineOptions {
        fix: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    let result = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert!(result.written);
    assert_eq!(result.edits_applied, 1);
    assert_eq!(result.edits_dropped, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "012x789\n");

    let diff = result.diff.expect("diff attached");
    assert!(diff.contains("-0123456789"));
    assert!(diff.contains("+012x789"));
}

// ---- Idempotence and boundary behaviors ----

#[test]
fn fixing_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.md", "# Hello   \ntext\tmore\n");
    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD009", "MD010"]);
    let options = PipelineOptions {
        fix: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    let first = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert!(first.written);
    let after_first = fs::read_to_string(&path).unwrap();

    let second = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert!(!second.written);
    assert!(second.fix_plan.is_none());
    assert_eq!(second.edits_applied, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
}

#[test]
fn backup_created_once_and_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let original = "first   \n";
    let path = write_file(&dir, "a.md", original);
    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD009"]);
    let options = PipelineOptions {
        fix: true,
        backups: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    pipeline.process(&CancelToken::new(), &path).unwrap();
    let backup = mdguard::fsio::backup_path(&path);
    assert_eq!(fs::read_to_string(&backup).unwrap(), original);

    // Introduce a new violation; the second fix must not clobber the backup.
    fs::write(&path, "second   \n").unwrap();
    pipeline.process(&CancelToken::new(), &path).unwrap();
    assert_eq!(fs::read_to_string(&backup).unwrap(), original);
}

#[test]
fn unfixable_diagnostic_alone_never_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.md", "paragraph first\n");
    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD041"]);
    let options = PipelineOptions {
        fix: true,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    let result = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].fix_edits.is_empty());
    assert!(!result.written);
}

#[test]
fn empty_file_parses_to_empty_document() {
    let snapshot = mdguard::parser::parse(
        &CancelToken::new(),
        std::path::Path::new("empty.md"),
        "",
        mdguard::Flavor::CommonMark,
    )
    .unwrap();
    assert_eq!(snapshot.children(snapshot.root()).count(), 0);
    assert!(snapshot.tokens.is_empty());
    assert_eq!(snapshot.line_count(), 0);
}

#[test]
fn run_result_order_matches_discovery_with_ignores() {
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir, "keep.md", "# ok\n");
    let sub = dir.path().join("drafts");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("wip.md"), "# wip\n").unwrap();

    let discovery = DiscoveryOptions {
        cwd: dir.path().to_path_buf(),
        exclude: vec!["drafts/**".to_string()],
        ..Default::default()
    };
    let files = discover_files(&[dir.path().to_path_buf()], &discovery).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("keep.md"));
}

#[test]
fn gfm_flavor_enables_extensions_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "a.md", "- [x] task   \n");
    let registry = Registry::with_builtin_rules();
    let rules = resolved(&["MD009"]);
    let options = PipelineOptions {
        flavor: mdguard::Flavor::Gfm,
        ..Default::default()
    };
    let pipeline = Pipeline::new(&registry, &rules, options);

    let result = pipeline.process(&CancelToken::new(), &path).unwrap();
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn library_version_exposed() {
    assert!(mdguard::version().starts_with("0."));
}
