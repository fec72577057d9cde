//! Backup and restore pipelines for edge-backup
//!
//! # Architecture
//!
//! The backup system consists of two orchestrators and the steps they share:
//!
//! - `BackupManager`: validate, clean cache folders, export the registry
//!   subtree, compress the profile root. Runs once per requested channel.
//! - `RestoreManager`: validate, dispose of existing `User Data`, import the
//!   registry export, extract the archive.
//! - `preconditions`: path checks and the browser-running check.
//! - `cleaner`, `disposer`, `inspect`: the individual steps.
//!
//! # Artifact Pair
//!
//! Every channel backup writes an archive and a registry export side by
//! side. If either half fails, both are deleted.
//!
//! # Example
//!
//! ```rust,ignore
//! use edgebackup::backup::{BackupManager, RestoreManager};
//! use edgebackup::models::{BackupRequest, Channel};
//! use edgebackup::system::Toolkit;
//!
//! let tools = Toolkit::system();
//! let mut request = BackupRequest::new(&context.default_destination);
//! request.channels = vec![Channel::Stable, Channel::Beta];
//!
//! let report = BackupManager::new(&context, &tools).run(&request)?;
//! for (channel, done) in report.completed() {
//!     println!("{}: {}", channel, done.artifacts.archive_file.display());
//! }
//! ```

pub mod cleaner;
pub mod disposer;
pub mod inspect;
pub mod preconditions;

mod manager;
mod restore;

pub use cleaner::CleanReport;
pub use disposer::Disposal;
pub use inspect::{validate_backup, ValidationResult};
pub use manager::{BackupManager, BackupReport, ChannelBackup, ChannelStatus};
pub use preconditions::{ProcessState, TerminationWait};
pub use restore::{RestoreManager, RestoreResult};
