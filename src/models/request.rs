//! Inputs and outputs of a backup or restore run

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::channel::Channel;

/// Process image the browser runs as, on every channel
pub const BROWSER_PROCESS: &str = "msedge.exe";

/// What a multi-channel backup does after one channel fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelFailurePolicy {
    /// Record the failure and move on to the next channel
    #[default]
    Continue,
    /// Stop at the first failed channel
    Abort,
}

/// What happens to an existing `User Data` folder before a restore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExistingDataPolicy {
    /// Keep it under a timestamped name
    Rename,
    /// Delete it irrecoverably
    Remove,
}

impl fmt::Display for ExistingDataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExistingDataPolicy::Rename => write!(f, "rename"),
            ExistingDataPolicy::Remove => write!(f, "remove"),
        }
    }
}

/// A request to back up one or more channels
#[derive(Debug, Clone)]
pub struct BackupRequest {
    pub destination: PathBuf,
    pub add_date_stamp: bool,
    pub folders_to_clean: BTreeSet<String>,
    pub close_browser_if_running: bool,
    pub channels: Vec<Channel>,
    pub failure_policy: ChannelFailurePolicy,
}

impl BackupRequest {
    /// A Stable-only request with the documented defaults
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            add_date_stamp: true,
            folders_to_clean: BTreeSet::from(["Cache".to_string()]),
            close_browser_if_running: false,
            channels: vec![Channel::Stable],
            failure_policy: ChannelFailurePolicy::default(),
        }
    }

    /// Channels in request order, each at most once
    pub fn unique_channels(&self) -> Vec<Channel> {
        let mut seen = BTreeSet::new();
        self.channels
            .iter()
            .copied()
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// A request to restore one channel from an artifact pair
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub archive_path: PathBuf,
    pub registry_file_path: PathBuf,
    pub existing_data_policy: ExistingDataPolicy,
    pub close_browser_if_running: bool,
    pub channel: Channel,
}

/// The archive + registry export produced by one channel backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupArtifactPair {
    pub archive_file: PathBuf,
    pub registry_file: PathBuf,
}

impl BackupArtifactPair {
    pub fn new(archive_file: impl Into<PathBuf>, registry_file: impl Into<PathBuf>) -> Self {
        Self {
            archive_file: archive_file.into(),
            registry_file: registry_file.into(),
        }
    }

    /// Both halves, archive first
    pub fn paths(&self) -> [&Path; 2] {
        [&self.archive_file, &self.registry_file]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_request_defaults() {
        let req = BackupRequest::new("/backups");
        assert!(req.add_date_stamp);
        assert!(!req.close_browser_if_running);
        assert_eq!(req.channels, vec![Channel::Stable]);
        assert!(req.folders_to_clean.contains("Cache"));
    }

    #[test]
    fn test_unique_channels_keeps_first_occurrence_order() {
        let mut req = BackupRequest::new("/backups");
        req.channels = vec![Channel::Dev, Channel::Stable, Channel::Dev, Channel::Beta];
        assert_eq!(
            req.unique_channels(),
            vec![Channel::Dev, Channel::Stable, Channel::Beta]
        );
    }
}
