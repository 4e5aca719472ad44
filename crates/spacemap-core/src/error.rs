//! Error types for scanning operations.
//!
//! Only failures that stop an analysis outright live here. Per-entry
//! failures during traversal are counted in an [`ErrorHistogram`] instead.
//!
//! [`ErrorHistogram`]: crate::ErrorHistogram

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an analysis.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The mount table could not be read.
    #[error("Cannot read mount table {path}: {source}")]
    MountTable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line in the mount table could not be parsed.
    #[error("Invalid mount table line: {line}")]
    InvalidMountLine { line: String },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not absolute and canonicalization was disabled.
    #[error("Root path must be absolute: {path}")]
    RelativeRoot { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Wrap a failure to read the mount table.
    pub fn mount_table(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::MountTable {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid mount line error.
    pub fn invalid_mount_line(line: impl Into<String>) -> Self {
        Self::InvalidMountLine { line: line.into() }
    }
}
