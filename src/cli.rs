//! Command-line front end: flag parsing, output rendering, exit codes

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::analysis::{Report, SortMode};
use crate::cancel::CancelToken;
use crate::config::{Config, RuleFormat, resolve_rules};
use crate::formatters;
use crate::parser::Flavor;
use crate::pipeline::PipelineOptions;
use crate::rules::Registry;
use crate::runner::{DiscoveryOptions, Runner, discover_files};
use crate::types::Error;

/// No issues found (or only below the strict threshold).
pub const EXIT_OK: i32 = 0;
/// Error-severity diagnostics present.
pub const EXIT_ERRORS: i32 = 1;
/// Warning-severity diagnostics present under `--strict`.
pub const EXIT_WARNINGS_STRICT: i32 = 2;
/// Invalid command-line usage.
pub const EXIT_USAGE: i32 = 64;
/// Configuration error.
pub const EXIT_CONFIG: i32 = 65;
/// Internal error.
pub const EXIT_INTERNAL: i32 = 70;
/// I/O error.
pub const EXIT_IO: i32 = 74;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Count,
    Alpha,
    Severity,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Count => SortMode::Count,
            SortArg::Alpha => SortMode::Alpha,
            SortArg::Severity => SortMode::Severity,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FlavorArg {
    Commonmark,
    Gfm,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum RuleFormatArg {
    Id,
    Name,
    Combined,
}

#[derive(Parser, Debug)]
#[command(name = "mdguard")]
#[command(about = "A linter for Markdown files with safe automatic fixes", long_about = None)]
#[command(version)]
struct Args {
    /// Files or directories to lint
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown dialect
    #[arg(long, value_enum)]
    flavor: Option<FlavorArg>,

    /// Automatically fix violations where possible
    #[arg(short, long)]
    fix: bool,

    /// Show the fixes as a unified diff without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Do not create sidecar backups before rewriting files
    #[arg(long)]
    no_backups: bool,

    /// Rules to enable (id or name, repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    enable: Vec<String>,

    /// Rules to disable (id or name, repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    disable: Vec<String>,

    /// Restrict fixing to these rules (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    fix_rules: Vec<String>,

    /// Glob patterns for files to ignore (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    ignore: Vec<String>,

    /// Number of worker threads (0 = number of hardware threads)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Follow symbolic links during discovery
    #[arg(long)]
    follow_symlinks: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// How rule identifiers are rendered
    #[arg(long, value_enum)]
    rule_format: Option<RuleFormatArg>,

    /// Print a per-rule summary after the diagnostics
    #[arg(long)]
    summary: bool,

    /// Sort order for the summary
    #[arg(long, value_enum, default_value = "count")]
    sort: SortArg,

    /// Treat warnings as a failure (exit code 2)
    #[arg(long)]
    strict: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// Map a fatal error to its exit code.
fn exit_code_for(error: &Error) -> i32 {
    match error {
        Error::ConfigInvalid(_) | Error::UnknownRule(_) => EXIT_CONFIG,
        Error::NotFound(_)
        | Error::PermissionDenied(_)
        | Error::IsDirectory(_)
        | Error::Io { .. } => EXIT_IO,
        Error::Internal(_) => EXIT_INTERNAL,
        _ => EXIT_INTERNAL,
    }
}

fn load_config(args: &Args) -> crate::types::Result<Config> {
    let mut config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        let start = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match Config::discover(&start) {
            Some(found) => found?,
            None => Config::new(),
        }
    };

    // Command-line flags win over the config file.
    if let Some(flavor) = args.flavor {
        config.flavor = match flavor {
            FlavorArg::Commonmark => Flavor::CommonMark,
            FlavorArg::Gfm => Flavor::Gfm,
        };
    }
    if args.fix {
        config.fix = true;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if args.no_backups {
        config.no_backups = true;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = Some(jobs);
    }
    if let Some(format) = args.rule_format {
        config.rule_format = match format {
            RuleFormatArg::Id => RuleFormat::Id,
            RuleFormatArg::Name => RuleFormat::Name,
            RuleFormatArg::Combined => RuleFormat::Combined,
        };
    }
    // Command-level lists append after the config file's so they win.
    config.enable.extend(args.enable.iter().cloned());
    config.disable.extend(args.disable.iter().cloned());
    config.fix_rules.extend(args.fix_rules.iter().cloned());
    config.ignore.extend(args.ignore.iter().cloned());

    Ok(config)
}

/// Run the CLI and return the process exit code.
pub fn run() -> i32 {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version are not usage errors.
            if err.use_stderr() {
                eprintln!("{err}");
                return EXIT_USAGE;
            }
            print!("{err}");
            return EXIT_OK;
        }
    };

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return exit_code_for(&err);
        }
    };

    let registry = Registry::with_builtin_rules();
    let resolution = match resolve_rules(&registry, &config) {
        Ok(resolution) => resolution,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return exit_code_for(&err);
        }
    };
    for warning in &resolution.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let discovery = DiscoveryOptions {
        cwd,
        exclude: config.ignore_globs().to_vec(),
        follow_symlinks: args.follow_symlinks,
        ..Default::default()
    };
    let files = match discover_files(&args.paths, &discovery) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            return exit_code_for(&err);
        }
    };
    if files.is_empty() {
        println!("No files to lint.");
        return EXIT_OK;
    }

    let pipeline_options = PipelineOptions {
        flavor: config.flavor,
        fix: config.fix,
        dry_run: config.dry_run,
        backups: config.backups_enabled(),
        fix_rules: resolution.fix_rules.clone(),
    };
    let runner = Runner::new(
        &registry,
        &resolution.rules,
        pipeline_options,
        config.jobs_or_default(),
    );
    let cancel = CancelToken::new();
    let output = runner.run(&files, &cancel);

    match args.output {
        OutputFormat::Text => {
            let text = formatters::format_text(&output.result, config.rule_format);
            if !text.is_empty() {
                println!("{text}");
            }
            if config.dry_run {
                for outcome in &output.result.files {
                    if let Some(diff) = outcome.result.as_ref().and_then(|r| r.diff.as_deref())
                        && !diff.is_empty()
                    {
                        println!("{diff}");
                    }
                }
            }
            if args.summary {
                print_summary(&output.result, args.sort.into(), config.rule_format);
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                formatters::format_json(&output.result, config.rule_format)
            );
        }
    }

    if let Some(error) = &output.error {
        eprintln!("{} {error}", "error:".red().bold());
        if !matches!(error, Error::Cancelled) {
            return exit_code_for(error);
        }
    }

    let stats = &output.result.stats;
    if stats.errors > 0 {
        EXIT_ERRORS
    } else if args.strict && stats.warnings > 0 {
        EXIT_WARNINGS_STRICT
    } else {
        EXIT_OK
    }
}

fn print_summary(run: &crate::types::RunResult, sort: SortMode, rule_format: RuleFormat) {
    let mut report = Report::from_run(run);
    report.sort_rules(sort);
    if report.rules.is_empty() {
        return;
    }
    println!();
    println!("{}", "Rule summary:".bold());
    for rule in &report.rules {
        println!(
            "  {:30} {:4} issues in {} files",
            crate::config::format_rule_ident(&rule.rule_id, &rule.rule_name, rule_format),
            rule.count(),
            rule.files.len()
        );
    }
}
