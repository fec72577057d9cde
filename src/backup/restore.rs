//! Restore orchestration
//!
//! Handles putting a profile back from an artifact pair: the existing
//! `User Data` folder is moved aside or deleted, the registry export is
//! imported, and the archive is extracted into the profile root.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::disposer::{self, Disposal};
use super::preconditions::{self, TerminationWait};
use crate::config::UserContext;
use crate::error::{BackupError, BackupResult};
use crate::models::{Channel, RestoreRequest, BROWSER_PROCESS, USER_DATA_DIR};
use crate::system::Toolkit;

/// Result of a restore operation
#[derive(Debug, Clone)]
pub struct RestoreResult {
    pub channel: Channel,
    /// The freshly restored `User Data` folder
    pub restored_path: PathBuf,
    /// What happened to the data that was there before
    pub disposal: Disposal,
    /// Entries extracted from the archive
    pub extracted_entries: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let previous = match &self.disposal {
            Disposal::Nothing => "no previous data".to_string(),
            Disposal::Renamed(path) => format!("previous data kept at {}", path.display()),
            Disposal::Removed => "previous data removed".to_string(),
        };
        format!(
            "Restored {} entries to {} ({})",
            self.extracted_entries,
            self.restored_path.display(),
            previous
        )
    }
}

/// Handles restoring from backups
pub struct RestoreManager<'a> {
    context: &'a UserContext,
    tools: &'a Toolkit,
    wait: TerminationWait,
    now: DateTime<Local>,
}

impl<'a> RestoreManager<'a> {
    /// Create a new RestoreManager stamped with the current time
    pub fn new(context: &'a UserContext, tools: &'a Toolkit) -> Self {
        Self {
            context,
            tools,
            wait: TerminationWait::default(),
            now: Local::now(),
        }
    }

    /// Use a fixed time for the rename suffix
    pub fn at(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }

    /// Override how long to wait for a force-closed browser
    pub fn with_termination_wait(mut self, wait: TerminationWait) -> Self {
        self.wait = wait;
        self
    }

    /// Restore one channel from an artifact pair
    ///
    /// Source artifacts are only read. If the import or the extraction
    /// fails, `User Data` and any other top-level entry this run added to the
    /// profile root are removed, and a renamed previous folder is moved back.
    /// Top-level entries that existed before the run but were overwritten by
    /// a partial extraction are left as they are.
    pub fn restore(&self, request: &RestoreRequest) -> BackupResult<RestoreResult> {
        preconditions::validate_restore_sources(&request.archive_path, &request.registry_file_path)?;
        preconditions::check_process_state(
            self.tools.processes.as_ref(),
            BROWSER_PROCESS,
            request.close_browser_if_running,
            self.wait,
        )?;

        let location = request.channel.resolve(self.context);
        let user_data = location.user_data_path();

        tracing::debug!(channel = %request.channel, state = "disposing-existing");
        let disposal = disposer::dispose(&user_data, request.existing_data_policy, &self.now)?;
        let existing = top_level_names(&location.profile_path);

        let restored = self.import_and_extract(request, &location.profile_path);
        match restored {
            Ok(extracted_entries) => Ok(RestoreResult {
                channel: request.channel,
                restored_path: user_data,
                disposal,
                extracted_entries,
            }),
            Err(err) => {
                remove_added_entries(&location.profile_path, &existing);
                if let Err(rollback_err) = disposer::roll_back(&user_data, &disposal) {
                    tracing::error!(error = %rollback_err, "rollback after failed restore did not complete");
                }
                Err(err)
            }
        }
    }

    fn import_and_extract(
        &self,
        request: &RestoreRequest,
        profile_path: &Path,
    ) -> BackupResult<usize> {
        tracing::debug!(channel = %request.channel, state = "importing-registry");
        self.tools.registry.import(&request.registry_file_path)?;

        tracing::debug!(channel = %request.channel, state = "decompressing");
        fs::create_dir_all(profile_path).map_err(|e| {
            BackupError::Decompression(format!(
                "Failed to create {}: {}",
                profile_path.display(),
                e
            ))
        })?;
        self.tools
            .archiver
            .decompress(&request.archive_path, profile_path)
            .map_err(|err| {
                tracing::warn!("registry was already imported; it is not rolled back");
                err
            })
    }
}

/// Names directly under `root`; empty if it does not exist yet
fn top_level_names(root: &Path) -> BTreeSet<OsString> {
    fs::read_dir(root)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.file_name()).collect())
        .unwrap_or_default()
}

/// Remove top-level entries of `root` that are not in `existing`
///
/// `User Data` is left to [`disposer::roll_back`].
fn remove_added_entries(root: &Path, existing: &BTreeSet<OsString>) {
    for name in top_level_names(root) {
        if existing.contains(&name) || name == USER_DATA_DIR {
            continue;
        }
        let path = root.join(&name);
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => tracing::warn!(path = %path.display(), "removed partially restored entry"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not remove partially restored entry"),
        }
    }
}
