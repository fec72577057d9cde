//! Clears cache-like folders before a profile is archived
//!
//! Every directory below the profile root whose name matches one of the
//! requested names has its immediate contents removed; the folder itself is
//! kept. Failures on individual folders are collected, not fatal.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{BackupError, BackupResult};

/// What a clean pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Folders whose name matched
    pub folders_matched: usize,
    /// Files and subfolders removed across all matched folders
    pub entries_removed: usize,
    /// Entries that could not be removed, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl CleanReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Folder names compare case-insensitively, as on Windows
fn matches_any(name: &str, folder_names: &BTreeSet<String>) -> bool {
    folder_names.iter().any(|n| n.eq_ignore_ascii_case(name))
}

fn matching_folders(root: &Path, folder_names: &BTreeSet<String>) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry while scanning for cache folders");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if matches_any(&entry.file_name().to_string_lossy(), folder_names) {
            found.push(entry.into_path());
            // Its contents are about to go, no need to look inside.
            walker.skip_current_dir();
        }
    }

    found
}

fn clear_contents(folder: &Path, report: &mut CleanReport) {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            report.failures.push((folder.to_path_buf(), e.to_string()));
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.failures.push((folder.to_path_buf(), e.to_string()));
                continue;
            }
        };
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let removed = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => report.entries_removed += 1,
            Err(e) => report.failures.push((path, e.to_string())),
        }
    }
}

/// Empty every folder named in `folder_names` below `profile_root`
///
/// Fails only when `profile_root` itself is missing.
pub fn clean(profile_root: &Path, folder_names: &BTreeSet<String>) -> BackupResult<CleanReport> {
    if !profile_root.is_dir() {
        return Err(BackupError::ProfileMissing(profile_root.to_path_buf()));
    }

    let mut report = CleanReport::default();
    if folder_names.is_empty() {
        return Ok(report);
    }

    for folder in matching_folders(profile_root, folder_names) {
        report.folders_matched += 1;
        clear_contents(&folder, &mut report);
    }

    for (path, reason) in &report.failures {
        tracing::warn!(path = %path.display(), %reason, "could not clear cache entry");
    }
    tracing::debug!(
        folders = report.folders_matched,
        removed = report.entries_removed,
        "cache clean finished"
    );

    Ok(report)
}
