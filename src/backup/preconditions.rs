//! Checks run before either pipeline touches anything
//!
//! Everything here fails with [`BackupError::PathInvalid`] or
//! [`BackupError::StillRunning`], and nothing here mutates the profile,
//! the registry, or the destination (creating the default destination is a
//! separate step the caller runs once every check has passed).

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::UserContext;
use crate::error::{BackupError, BackupResult};
use crate::models::naming::{ARCHIVE_EXTENSION, REGISTRY_EXTENSION};
use crate::system::ProcessControl;

/// Outcome of validating a backup destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationCheck {
    /// The directory exists
    Exists,
    /// The default destination is absent and will be created
    CreateDefault,
}

/// Outcome of the browser-running check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotRunning,
    /// It was running and has been stopped on request
    Terminated,
}

/// How long to wait for a force-closed browser to go away
#[derive(Debug, Clone, Copy)]
pub struct TerminationWait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for TerminationWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Validate a backup destination
///
/// A missing caller-supplied path is an error; a missing default
/// destination is reported as [`DestinationCheck::CreateDefault`].
pub fn validate_destination(path: &Path, context: &UserContext) -> BackupResult<DestinationCheck> {
    if path.is_dir() {
        return Ok(DestinationCheck::Exists);
    }
    if path.exists() {
        return Err(BackupError::path_invalid(path, "not a directory"));
    }
    if context.is_default_destination(path) {
        return Ok(DestinationCheck::CreateDefault);
    }
    Err(BackupError::path_invalid(path, "destination folder does not exist"))
}

/// Create the destination if validation asked for it
pub fn prepare_destination(path: &Path, check: DestinationCheck) -> BackupResult<()> {
    if check == DestinationCheck::CreateDefault {
        fs::create_dir_all(path).map_err(|e| {
            BackupError::path_invalid(path, format!("could not create default destination: {}", e))
        })?;
        tracing::info!(path = %path.display(), "created default destination");
    }
    Ok(())
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(expected))
}

fn require_file(path: &Path, extension: &str) -> BackupResult<()> {
    if !has_extension(path, extension) {
        return Err(BackupError::path_invalid(
            path,
            format!("expected a .{} file", extension),
        ));
    }
    if !path.is_file() {
        return Err(BackupError::path_invalid(path, "file does not exist"));
    }
    Ok(())
}

/// Validate the artifact pair a restore reads from
pub fn validate_restore_sources(archive: &Path, registry_file: &Path) -> BackupResult<()> {
    require_file(archive, ARCHIVE_EXTENSION)?;
    require_file(registry_file, REGISTRY_EXTENSION)
}

/// Make sure `process` is not running, stopping it if `force_close` is set
pub fn check_process_state(
    processes: &dyn ProcessControl,
    process: &str,
    force_close: bool,
    wait: TerminationWait,
) -> BackupResult<ProcessState> {
    if !processes.is_running(process)? {
        return Ok(ProcessState::NotRunning);
    }
    if !force_close {
        return Err(BackupError::still_running(process));
    }

    tracing::info!(process, "closing running browser");
    processes.terminate(process)?;

    let deadline = Instant::now() + wait.timeout;
    loop {
        if !processes.is_running(process)? {
            return Ok(ProcessState::Terminated);
        }
        if Instant::now() >= deadline {
            return Err(BackupError::still_running(process));
        }
        thread::sleep(wait.poll_interval);
    }
}
