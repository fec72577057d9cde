//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup pipelines.

pub mod backup;
pub mod info;
pub mod restore;

pub use backup::{handle_backup_command, BackupArgs};
pub use info::{handle_channels_command, handle_config_command, handle_history_command, HistoryArgs};
pub use restore::{handle_restore_command, handle_verify_command, RestoreArgs, VerifyArgs};

use crate::config::{Settings, ToolPaths, UserContext};
use crate::journal::{JournalEntry, JournalLogger};
use crate::system::Toolkit;

/// Everything a command needs, resolved once at startup
pub struct Session {
    pub paths: ToolPaths,
    pub settings: Settings,
    pub context: UserContext,
    pub tools: Toolkit,
}

impl Session {
    /// Append entries to the journal if it is enabled
    ///
    /// Journal failures are logged, never fatal.
    pub fn record(&self, entries: &[JournalEntry]) {
        if !self.settings.journal_enabled {
            return;
        }
        let logger = JournalLogger::new(self.paths.journal_file());
        if let Err(e) = logger.log_batch(entries) {
            tracing::warn!(error = %e, "could not write journal");
        }
    }
}
