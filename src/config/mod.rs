//! Configuration module for edge-backup
//!
//! This module provides configuration management including:
//! - Resolution of the tool's own state directory
//! - User settings persistence
//! - The per-user context the orchestrators run against

pub mod context;
pub mod paths;
pub mod settings;

pub use context::UserContext;
pub use paths::ToolPaths;
pub use settings::Settings;
