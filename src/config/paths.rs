//! Path management for edge-backup's own files
//!
//! ## Path Resolution Order
//!
//! 1. `EDGE_BACKUP_HOME` environment variable (if set)
//! 2. The platform config directory (`%APPDATA%\edge-backup\config` on Windows,
//!    `~/.config/edge-backup` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BackupError;

/// Environment variable overriding the tool's home directory
pub const HOME_ENV: &str = "EDGE_BACKUP_HOME";

/// Manages the paths of the settings file and journal
#[derive(Debug, Clone)]
pub struct ToolPaths {
    /// Base directory for all edge-backup state
    base_dir: PathBuf,
}

impl ToolPaths {
    /// Create a new ToolPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BackupError> {
        let base_dir = match std::env::var(HOME_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create ToolPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the operation journal
    pub fn journal_file(&self) -> PathBuf {
        self.base_dir.join("journal.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackupError::Io(format!("Failed to create base directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, BackupError> {
    ProjectDirs::from("", "", "edge-backup")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BackupError::Config("Could not determine a home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ToolPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.journal_file(), temp_dir.path().join("journal.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("home");
        let paths = ToolPaths::with_base_dir(base.clone());

        paths.ensure_directories().unwrap();

        assert!(base.is_dir());
    }
}
