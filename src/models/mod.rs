//! Core data models for edge-backup
//!
//! Channels and the locations they resolve to, request types for the two
//! pipelines, and the naming rules for the artifacts they produce.

pub mod channel;
pub mod naming;
pub mod request;

pub use channel::{Channel, ChannelLocation, USER_DATA_DIR};
pub use request::{
    BackupArtifactPair, BackupRequest, ChannelFailurePolicy, ExistingDataPolicy, RestoreRequest,
    BROWSER_PROCESS,
};
