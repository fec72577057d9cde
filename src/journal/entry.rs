//! Journal entry data structures

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Channel;

/// Types of operations that are journaled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Backup,
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Backup => write!(f, "BACKUP"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

/// How a journaled run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Succeeded,
    Failed,
    Skipped,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Succeeded => write!(f, "ok"),
            Outcome::Failed => write!(f, "failed"),
            Outcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// A single journal entry: one channel of one backup or restore run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Shared by every entry of the same invocation
    pub run_id: Uuid,

    /// When the channel finished (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub channel: Channel,

    pub outcome: Outcome,

    /// Files written (backup) or read (restore)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<PathBuf>,

    /// Error text or a short summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JournalEntry {
    pub fn new(run_id: Uuid, operation: Operation, channel: Channel, outcome: Outcome) -> Self {
        Self {
            run_id,
            timestamp: Utc::now(),
            operation,
            channel,
            outcome,
            artifacts: Vec::new(),
            message: None,
        }
    }

    pub fn with_artifacts<I, P>(mut self, artifacts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.artifacts = artifacts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
