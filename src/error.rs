//! Error types and process exit codes.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that abort a scan before any file is hashed.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid root {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("unreadable file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HashError {
    pub fn path(&self) -> &Path {
        match self {
            HashError::Unreadable { path, .. } => path,
        }
    }
}

/// Why a single removal failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteFailure {
    #[error("file not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("path is a directory")]
    IsDirectory,

    #[error("{0}")]
    Io(String),
}

impl DeleteFailure {
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DeleteFailure::NotFound,
            io::ErrorKind::PermissionDenied => DeleteFailure::PermissionDenied,
            _ if path.is_dir() => DeleteFailure::IsDirectory,
            _ => DeleteFailure::Io(err.to_string()),
        }
    }
}

/// Exit codes for the binary.
///
/// - 0: finished normally, with or without duplicates
/// - 1: unexpected failure, including an invalid root
/// - 3: finished, but some deletions failed
/// - 130: interrupted by Ctrl+C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    PartialSuccess = 3,
    Interrupted = 130,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
