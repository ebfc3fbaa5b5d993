//! Diagnostics and text edits

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error level
    Error,
    /// Warning level
    Warning,
    /// Informational level
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// A half-open byte-range replacement over pre-fix content.
///
/// `start == end` is an insertion at that offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    /// First byte replaced (0-based, inclusive)
    pub start: usize,
    /// One past the last byte replaced (exclusive)
    pub end: usize,
    /// Replacement text
    pub replacement: String,
}

impl TextEdit {
    /// Replace the bytes in `start..end` with `replacement`.
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Insert `text` at `offset` without deleting anything.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset, offset, text)
    }

    /// Delete the bytes in `start..end`.
    pub fn delete(start: usize, end: usize) -> Self {
        Self::replace(start, end, "")
    }

    /// Whether this edit touches no bytes (pure insertion).
    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }

    /// Two edits conflict iff their ranges overlap.
    ///
    /// Touching ranges (`a.end == b.start`) do not conflict, so two
    /// insertions at the same offset coexist.
    pub fn overlaps(&self, other: &TextEdit) -> bool {
        let (a, b) = if (self.start, self.end) <= (other.start, other.end) {
            (self, other)
        } else {
            (other, self)
        };
        a.end > b.start
    }
}

/// A single reported issue with location, severity, message, and optional fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Rule id (e.g. "MD009")
    pub rule_id: String,

    /// Rule name (e.g. "no-trailing-spaces")
    pub rule_name: String,

    /// Severity of this diagnostic
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Optional suggestion for resolving the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// File the diagnostic belongs to
    pub file_path: PathBuf,

    /// First line of the issue (1-based)
    pub start_line: usize,

    /// First column of the issue (1-based)
    pub start_column: usize,

    /// Last line of the issue (1-based, inclusive)
    pub end_line: usize,

    /// Column one past the end of the issue (1-based)
    pub end_column: usize,

    /// Edits that would fix the issue; empty when not fixable
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fix_edits: Vec<TextEdit>,
}

impl Diagnostic {
    /// Whether this diagnostic carries at least one fix edit.
    pub fn is_fixable(&self) -> bool {
        !self.fix_edits.is_empty()
    }

    /// Sort key for the stable diagnostic order within a file.
    pub fn sort_key(&self) -> (usize, usize, &str) {
        (self.start_line, self.start_column, &self.rule_id)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} {}/{} {}",
            self.file_path.display(),
            self.start_line,
            self.start_column,
            self.severity,
            self.rule_id,
            self.rule_name,
            self.message
        )
    }
}

/// Builder-style constructor used by rules.
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    diag: Diagnostic,
}

impl DiagnosticBuilder {
    /// Start a diagnostic for `rule_id`/`rule_name` at a source position.
    pub fn new(rule_id: &str, rule_name: &str, message: impl Into<String>) -> Self {
        Self {
            diag: Diagnostic {
                rule_id: rule_id.to_string(),
                rule_name: rule_name.to_string(),
                severity: Severity::Warning,
                message: message.into(),
                suggestion: None,
                file_path: PathBuf::new(),
                start_line: 1,
                start_column: 1,
                end_line: 1,
                end_column: 1,
                fix_edits: Vec::new(),
            },
        }
    }

    /// Set the position span (1-based lines and columns).
    pub fn at(mut self, start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        self.diag.start_line = start_line;
        self.diag.start_column = start_column;
        self.diag.end_line = end_line;
        self.diag.end_column = end_column;
        self
    }

    /// Attach a suggestion string.
    pub fn suggestion(mut self, s: impl Into<String>) -> Self {
        self.diag.suggestion = Some(s.into());
        self
    }

    /// Attach a fix edit.
    pub fn fix(mut self, edit: TextEdit) -> Self {
        self.diag.fix_edits.push(edit);
        self
    }

    /// Finish the diagnostic. The engine fills in `file_path` and the
    /// configured severity.
    pub fn build(self) -> Diagnostic {
        self.diag
    }
}
