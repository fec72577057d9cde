//! Custom error types for edge-backup
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for backup and restore operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// A source or destination path is missing or malformed
    #[error("Invalid path {path}: {reason}")]
    PathInvalid { path: PathBuf, reason: String },

    /// The browser is running and force-close was not requested
    #[error("{process} is still running; close it or pass --close-browser")]
    StillRunning { process: String },

    /// The channel's profile root does not exist
    #[error("Profile folder not found: {0}")]
    ProfileMissing(PathBuf),

    /// Registry export failed
    #[error("Registry export error: {0}")]
    Export(String),

    /// Registry import failed
    #[error("Registry import error: {0}")]
    Import(String),

    /// Archive creation failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// Archive extraction failed
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl BackupError {
    /// Create a `PathInvalid` error for a path
    pub fn path_invalid(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::PathInvalid {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a `StillRunning` error for a process
    pub fn still_running(process: impl Into<String>) -> Self {
        Self::StillRunning {
            process: process.into(),
        }
    }

    /// Check if this error was raised before any mutation took place
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::PathInvalid { .. } | Self::StillRunning { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackupError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_path_invalid_error() {
        let err = BackupError::path_invalid("/nowhere", "does not exist");
        assert_eq!(err.to_string(), "Invalid path /nowhere: does not exist");
        assert!(err.is_precondition());
    }

    #[test]
    fn test_still_running_error() {
        let err = BackupError::still_running("msedge.exe");
        assert!(err.to_string().starts_with("msedge.exe is still running"));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_mutation_errors_are_not_preconditions() {
        assert!(!BackupError::Export("boom".into()).is_precondition());
        assert!(!BackupError::ProfileMissing(PathBuf::from("x")).is_precondition());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BackupError = io_err.into();
        assert!(matches!(err, BackupError::Io(_)));
    }
}
