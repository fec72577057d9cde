//! Operation journal for edge-backup
//!
//! Records every channel of every backup and restore run in an append-only
//! JSONL file, so `edge-backup history` can show what was written where.
//!
//! # Example
//!
//! ```rust,ignore
//! use edgebackup::journal::{JournalEntry, JournalLogger, Operation, Outcome};
//!
//! let logger = JournalLogger::new(paths.journal_file());
//! let entry = JournalEntry::new(run_id, Operation::Backup, Channel::Stable, Outcome::Succeeded)
//!     .with_artifacts([archive, registry]);
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{JournalEntry, Operation, Outcome};
pub use logger::JournalLogger;
