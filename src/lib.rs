//! edge-backup - Microsoft Edge profile backup and restore
//!
//! This library snapshots a browser channel's profile folder and the
//! matching `PreferenceMACs` registry subtree into an archive pair, and puts
//! them back later.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Tool paths, settings, and the per-user context
//! - `error`: Custom error types
//! - `models`: Channels, requests, and artifact naming
//! - `system`: Registry, archive, and process collaborators behind traits
//! - `backup`: The backup and restore pipelines
//! - `journal`: Append-only history of runs
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use edgebackup::config::{Settings, ToolPaths, UserContext};
//! use edgebackup::backup::BackupManager;
//! use edgebackup::models::BackupRequest;
//! use edgebackup::system::Toolkit;
//!
//! let paths = ToolPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let context = UserContext::from_env(&settings)?;
//! let tools = Toolkit::system();
//!
//! let request = BackupRequest::new(&context.default_destination);
//! let report = BackupManager::new(&context, &tools).run(&request)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod journal;
pub mod logging;
pub mod models;
pub mod system;

pub use error::{BackupError, BackupResult};
