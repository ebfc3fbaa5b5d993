//! Error types for mdguard

use std::path::PathBuf;

/// Main error type for mdguard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File does not exist
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// File exists but cannot be read or written
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Path points at a directory where a file was expected
    #[error("is a directory: {0}")]
    IsDirectory(PathBuf),

    /// Generic read/write failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Parser adapter failure
    #[error("parse error in {path}: {message}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// A rule failed while running
    #[error("rule {rule_id} failed: {message}")]
    Rule {
        /// Id of the offending rule
        rule_id: String,
        /// What went wrong
        message: String,
    },

    /// File changed on disk between read and write-back
    #[error("concurrent modification detected: {0}")]
    ConcurrentModification(PathBuf),

    /// Malformed configuration, fatal for the run
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A configured rule id or name is not in the registry
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// The run was cancelled; partial results may still be available
    #[error("cancelled")]
    Cancelled,

    /// Invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify an I/O error against the path that produced it.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Error::PermissionDenied(path),
            std::io::ErrorKind::IsADirectory => Error::IsDirectory(path),
            _ => Error::Io { path, source: err },
        }
    }

    /// Whether this error aborts the whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigInvalid(_) | Error::UnknownRule(_) | Error::Cancelled
        )
    }
}

/// Result type alias for mdguard operations
pub type Result<T> = std::result::Result<T, Error>;
