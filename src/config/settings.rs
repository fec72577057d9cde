//! User settings for edge-backup
//!
//! Holds the defaults the `backup` command falls back to when a flag is not
//! given, plus logging and journal preferences.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::ToolPaths;
use crate::error::BackupError;
use crate::models::ChannelFailurePolicy;

/// User settings for edge-backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Destination used when `--destination` is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_destination: Option<PathBuf>,

    /// Whether archive names carry a date stamp by default
    #[serde(default = "default_add_date_stamp")]
    pub add_date_stamp: bool,

    /// Folder names whose contents are cleared before compression
    #[serde(default = "default_folders_to_clean")]
    pub folders_to_clean: Vec<String>,

    /// What a multi-channel backup does after one channel fails
    #[serde(default)]
    pub channel_failure_policy: ChannelFailurePolicy,

    /// tracing filter used when `EDGE_BACKUP_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether runs are recorded in the journal
    #[serde(default = "default_journal_enabled")]
    pub journal_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_add_date_stamp() -> bool {
    true
}

fn default_folders_to_clean() -> Vec<String> {
    vec!["Cache".to_string()]
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_journal_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_destination: None,
            add_date_stamp: default_add_date_stamp(),
            folders_to_clean: default_folders_to_clean(),
            channel_failure_policy: ChannelFailurePolicy::default(),
            log_level: default_log_level(),
            journal_enabled: default_journal_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ToolPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BackupError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackupError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ToolPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackupError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BackupError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
