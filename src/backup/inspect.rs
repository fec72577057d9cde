//! Read-only checks on an artifact pair before restoring it

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::preconditions;
use crate::error::{BackupError, BackupResult};
use crate::models::USER_DATA_DIR;
use crate::system::Archiver;

/// Result of validating a backup
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Number of entries in the archive
    pub archive_entries: usize,
    /// Top-level names inside the archive
    pub top_level: BTreeSet<String>,
    /// Size of the registry export in bytes
    pub registry_bytes: u64,
}

impl ValidationResult {
    /// Whether the archive carries a `User Data` folder
    pub fn has_user_data(&self) -> bool {
        self.top_level.contains(USER_DATA_DIR)
    }

    /// Check if the pair looks restorable
    pub fn is_complete(&self) -> bool {
        self.has_user_data() && self.registry_bytes > 0
    }

    /// Get a summary of what the pair contains
    pub fn summary(&self) -> String {
        let mut missing = Vec::new();
        if !self.has_user_data() {
            missing.push("User Data folder");
        }
        if self.registry_bytes == 0 {
            missing.push("registry data");
        }

        if missing.is_empty() {
            format!("Complete backup ({} archive entries)", self.archive_entries)
        } else {
            format!(
                "Incomplete backup ({} archive entries): missing {}",
                self.archive_entries,
                missing.join(", ")
            )
        }
    }
}

/// Validate an artifact pair without restoring it
pub fn validate_backup(
    archiver: &dyn Archiver,
    archive: &Path,
    registry_file: &Path,
) -> BackupResult<ValidationResult> {
    preconditions::validate_restore_sources(archive, registry_file)?;

    let names = archiver.list_entries(archive)?;
    let top_level = names
        .iter()
        .filter_map(|name| name.split('/').next())
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .collect();

    let registry_bytes = fs::metadata(registry_file)
        .map_err(|e| BackupError::Io(format!("Failed to read {}: {}", registry_file.display(), e)))?
        .len();

    Ok(ValidationResult {
        archive_entries: names.len(),
        top_level,
        registry_bytes,
    })
}
