//! Moves or deletes an existing `User Data` folder ahead of a restore

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::error::{BackupError, BackupResult};
use crate::models::naming::rename_stamp;
use crate::models::ExistingDataPolicy;

/// What happened to the existing data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposal {
    /// There was nothing to dispose of
    Nothing,
    /// Moved aside to this path
    Renamed(PathBuf),
    /// Deleted
    Removed,
}

/// First free `<name>-<stamp>` (or `<name>-<stamp>-N`) sibling of `path`
fn renamed_path(path: &Path, stamp: &str) -> BackupResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| BackupError::Io(format!("Cannot rename {}", path.display())))?
        .to_string_lossy()
        .into_owned();

    let first = path.with_file_name(format!("{}-{}", name, stamp));
    if !first.exists() {
        return Ok(first);
    }
    (2..)
        .map(|n| path.with_file_name(format!("{}-{}-{}", name, stamp, n)))
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| BackupError::Io("No free name for renamed folder".into()))
}

/// Dispose of `user_data` according to `policy`
pub fn dispose<Tz: TimeZone>(
    user_data: &Path,
    policy: ExistingDataPolicy,
    now: &DateTime<Tz>,
) -> BackupResult<Disposal>
where
    Tz::Offset: std::fmt::Display,
{
    if !user_data.exists() {
        return Ok(Disposal::Nothing);
    }

    match policy {
        ExistingDataPolicy::Rename => {
            let target = renamed_path(user_data, &rename_stamp(now))?;
            fs::rename(user_data, &target).map_err(|e| {
                BackupError::Io(format!(
                    "Failed to rename {} to {}: {}",
                    user_data.display(),
                    target.display(),
                    e
                ))
            })?;
            tracing::info!(from = %user_data.display(), to = %target.display(), "renamed existing user data");
            Ok(Disposal::Renamed(target))
        }
        ExistingDataPolicy::Remove => {
            fs::remove_dir_all(user_data).map_err(|e| {
                BackupError::Io(format!("Failed to remove {}: {}", user_data.display(), e))
            })?;
            tracing::info!(path = %user_data.display(), "removed existing user data");
            Ok(Disposal::Removed)
        }
    }
}

/// Undo what [`dispose`] and a failed restore left behind
///
/// Removes whatever now sits at `user_data` (it was created by the failed
/// run) and moves a renamed folder back into place.
pub fn roll_back(user_data: &Path, disposal: &Disposal) -> BackupResult<()> {
    if user_data.exists() {
        fs::remove_dir_all(user_data).map_err(|e| {
            BackupError::Io(format!(
                "Failed to remove partially restored {}: {}",
                user_data.display(),
                e
            ))
        })?;
    }

    match disposal {
        Disposal::Renamed(moved) => {
            fs::rename(moved, user_data).map_err(|e| {
                BackupError::Io(format!(
                    "Failed to move {} back to {}: {}",
                    moved.display(),
                    user_data.display(),
                    e
                ))
            })?;
            tracing::warn!(path = %user_data.display(), "restored previous user data after failure");
        }
        Disposal::Removed => {
            tracing::warn!(path = %user_data.display(), "previous user data was removed and cannot be recovered");
        }
        Disposal::Nothing => {}
    }

    Ok(())
}
