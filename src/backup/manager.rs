//! Backup orchestration
//!
//! Per channel: clean cache folders, export the registry subtree, then zip
//! the profile root. The archive and the registry export are kept or
//! removed together.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::cleaner::{self, CleanReport};
use super::preconditions::{self, TerminationWait};
use crate::config::UserContext;
use crate::error::{BackupError, BackupResult};
use crate::models::naming::{archive_file_name, date_stamp, registry_file_name};
use crate::models::{
    BackupArtifactPair, BackupRequest, Channel, ChannelFailurePolicy, BROWSER_PROCESS,
};
use crate::system::Toolkit;

/// What one successful channel backup produced
#[derive(Debug, Clone)]
pub struct ChannelBackup {
    pub artifacts: BackupArtifactPair,
    pub clean: CleanReport,
    /// Entries written to the archive
    pub archived_entries: usize,
}

/// How a single channel fared
#[derive(Debug)]
pub enum ChannelStatus {
    Completed(ChannelBackup),
    Failed(BackupError),
    /// Not attempted because an earlier channel failed under `Abort`
    Skipped,
}

/// Outcome of a multi-channel backup
#[derive(Debug)]
pub struct BackupReport {
    pub destination: PathBuf,
    pub channels: Vec<(Channel, ChannelStatus)>,
}

impl BackupReport {
    /// Check if every requested channel completed
    pub fn all_succeeded(&self) -> bool {
        self.channels
            .iter()
            .all(|(_, status)| matches!(status, ChannelStatus::Completed(_)))
    }

    /// Channels that completed, with their artifacts
    pub fn completed(&self) -> impl Iterator<Item = (Channel, &ChannelBackup)> {
        self.channels.iter().filter_map(|(channel, status)| match status {
            ChannelStatus::Completed(done) => Some((*channel, done)),
            _ => None,
        })
    }

    /// Channels that failed, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (Channel, &BackupError)> {
        self.channels.iter().filter_map(|(channel, status)| match status {
            ChannelStatus::Failed(err) => Some((*channel, err)),
            _ => None,
        })
    }
}

/// Runs backups for one user
pub struct BackupManager<'a> {
    context: &'a UserContext,
    tools: &'a Toolkit,
    wait: TerminationWait,
    now: DateTime<Local>,
}

impl<'a> BackupManager<'a> {
    /// Create a new BackupManager stamped with the current time
    pub fn new(context: &'a UserContext, tools: &'a Toolkit) -> Self {
        Self {
            context,
            tools,
            wait: TerminationWait::default(),
            now: Local::now(),
        }
    }

    /// Use a fixed time for date stamps
    pub fn at(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }

    /// Override how long to wait for a force-closed browser
    pub fn with_termination_wait(mut self, wait: TerminationWait) -> Self {
        self.wait = wait;
        self
    }

    /// Validate the request, then back up each channel in order
    ///
    /// Precondition failures are returned as `Err` before anything is
    /// written. Per-channel failures are reported in the [`BackupReport`].
    pub fn run(&self, request: &BackupRequest) -> BackupResult<BackupReport> {
        let destination = request.destination.as_path();
        let check = preconditions::validate_destination(destination, self.context)?;
        preconditions::check_process_state(
            self.tools.processes.as_ref(),
            BROWSER_PROCESS,
            request.close_browser_if_running,
            self.wait,
        )?;
        preconditions::prepare_destination(destination, check)?;

        let mut report = BackupReport {
            destination: destination.to_path_buf(),
            channels: Vec::new(),
        };
        let mut aborted = false;

        for channel in request.unique_channels() {
            if aborted {
                report.channels.push((channel, ChannelStatus::Skipped));
                continue;
            }

            match self.backup_channel(channel, request) {
                Ok(done) => {
                    tracing::info!(%channel, archive = %done.artifacts.archive_file.display(), "channel backed up");
                    report.channels.push((channel, ChannelStatus::Completed(done)));
                }
                Err(err) => {
                    tracing::error!(%channel, error = %err, "channel backup failed");
                    report.channels.push((channel, ChannelStatus::Failed(err)));
                    aborted = request.failure_policy == ChannelFailurePolicy::Abort;
                }
            }
        }

        Ok(report)
    }

    /// Clean, export and compress a single channel
    pub fn backup_channel(
        &self,
        channel: Channel,
        request: &BackupRequest,
    ) -> BackupResult<ChannelBackup> {
        let location = channel.resolve(self.context);
        if !location.profile_path.is_dir() {
            return Err(BackupError::ProfileMissing(location.profile_path));
        }

        tracing::debug!(%channel, state = "cleaning");
        let clean = cleaner::clean(&location.profile_path, &request.folders_to_clean)?;

        let stamp = request.add_date_stamp.then(|| date_stamp(&self.now));
        let username = &self.context.username;
        let artifacts = BackupArtifactPair::new(
            request
                .destination
                .join(archive_file_name(channel, stamp.as_deref(), username)),
            request
                .destination
                .join(registry_file_name(channel, stamp.as_deref(), username)),
        );

        // A pair from an earlier run under the same names goes as a whole.
        for path in artifacts.paths() {
            remove_stale(path).map_err(|e| {
                BackupError::Io(format!("Could not remove existing {}: {}", path.display(), e))
            })?;
        }

        tracing::debug!(%channel, state = "exporting-registry", key = %location.registry_key);
        if let Err(err) = self
            .tools
            .registry
            .export(&location.registry_key, &artifacts.registry_file)
        {
            discard(&artifacts.registry_file);
            return Err(err);
        }

        tracing::debug!(%channel, state = "compressing");
        let compressed = self
            .tools
            .archiver
            .compress(&location.profile_path, &artifacts.archive_file);

        match compressed {
            Ok(archived_entries) => Ok(ChannelBackup {
                artifacts,
                clean,
                archived_entries,
            }),
            Err(err) => {
                for path in artifacts.paths() {
                    discard(path);
                }
                Err(err)
            }
        }
    }
}

/// Delete a leftover artifact so the external tool can write a fresh one
fn remove_stale(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed existing artifact");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Best-effort removal of an artifact written by this run
fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::warn!(path = %path.display(), "rolled back partial artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not roll back artifact"),
    }
}
