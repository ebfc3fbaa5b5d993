//! # mdguard
//!
//! A style checker for Markdown/CommonMark files with safe automatic fixes.
//!
//! ## Features
//!
//! - **Two dialects**: plain CommonMark and a GFM superset (tables, task
//!   lists, strikethrough, autolinks)
//! - **Automatic fixing** with conflict detection, modification guards,
//!   sidecar backups, and atomic write-back
//! - **Custom rules** via the [`rules::Rule`] trait
//! - **Configuration** via JSON, YAML, or TOML files
//! - **Deterministic parallel runs**: output order never depends on worker
//!   scheduling
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mdguard::cancel::CancelToken;
//! use mdguard::config::{Config, resolve_rules};
//! use mdguard::pipeline::PipelineOptions;
//! use mdguard::rules::Registry;
//! use mdguard::runner::{DiscoveryOptions, Runner, discover_files};
//!
//! let registry = Registry::with_builtin_rules();
//! let config = Config::new();
//! let resolution = resolve_rules(&registry, &config)?;
//!
//! let files = discover_files(&["docs".into()], &DiscoveryOptions::default())?;
//! let runner = Runner::new(&registry, &resolution.rules, PipelineOptions::default(), 0);
//! let output = runner.run(&files, &CancelToken::new());
//! println!("{} issues", output.result.stats.total_diagnostics());
//! # Ok::<(), mdguard::types::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod cancel;
pub mod config;
pub mod engine;
pub mod fix;
pub mod formatters;
pub mod fsio;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod runner;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main surface
pub use cancel::CancelToken;
pub use config::{Config, resolve_rules};
pub use parser::{FileSnapshot, Flavor};
pub use pipeline::{Pipeline, PipelineOptions};
pub use rules::{Registry, Rule, RuleContext};
pub use runner::{DiscoveryOptions, Runner, discover_files};
pub use types::{Diagnostic, Error, Result, RunResult, Severity, TextEdit};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the library version
pub fn version() -> &'static str {
    VERSION
}
