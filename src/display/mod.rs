//! Display formatting for terminal output
//!
//! Tables for channel locations and the journal, and plain-text summaries of
//! backup and restore runs.

pub mod channels;
pub mod history;
pub mod report;

pub use channels::format_channel_table;
pub use history::format_history;
pub use report::{format_backup_report, format_size};
