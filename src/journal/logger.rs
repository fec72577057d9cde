//! Append-only journal file
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{BackupError, BackupResult};

use super::entry::JournalEntry;

/// Handles writing journal entries to the journal file
///
/// The file uses a line-delimited JSON format (JSONL) where each line
/// is a complete JSON object representing one entry.
pub struct JournalLogger {
    log_path: PathBuf,
}

impl JournalLogger {
    /// Create a new JournalLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> BackupResult<File> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BackupError::Io(format!("Failed to create journal directory: {}", e))
            })?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| BackupError::Io(format!("Failed to open journal: {}", e)))
    }

    /// Append one entry
    pub fn log(&self, entry: &JournalEntry) -> BackupResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries, flushing once at the end
    pub fn log_batch(&self, entries: &[JournalEntry]) -> BackupResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;

        for entry in entries {
            let json = serde_json::to_string(entry).map_err(|e| {
                BackupError::Json(format!("Failed to serialize journal entry: {}", e))
            })?;

            writeln!(file, "{}", json)
                .map_err(|e| BackupError::Io(format!("Failed to write journal entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| BackupError::Io(format!("Failed to flush journal: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> BackupResult<Vec<JournalEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BackupError::Io(format!("Failed to open journal: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                BackupError::Io(format!("Failed to read journal line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: JournalEntry = serde_json::from_str(&line).map_err(|e| {
                BackupError::Json(format!(
                    "Failed to parse journal entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries
    pub fn read_recent(&self, count: usize) -> BackupResult<Vec<JournalEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Get the number of entries in the journal
    pub fn entry_count(&self) -> BackupResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BackupError::Io(format!("Failed to open journal: {}", e)))?;

        let reader = BufReader::new(file);
        Ok(reader
            .lines()
            .filter_map(|l| l.ok())
            .filter(|l| !l.trim().is_empty())
            .count())
    }

    /// Get the path to the journal file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::entry::{Operation, Outcome};
    use crate::models::Channel;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn create_test_logger() -> (JournalLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = JournalLogger::new(temp_dir.path().join("state").join("journal.log"));
        (logger, temp_dir)
    }

    fn entry(channel: Channel) -> JournalEntry {
        JournalEntry::new(Uuid::new_v4(), Operation::Backup, channel, Outcome::Succeeded)
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();

        logger.log(&entry(Channel::Stable)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Backup);
        assert_eq!(entries[0].channel, Channel::Stable);
    }

    #[test]
    fn test_log_batch_and_count() {
        let (logger, _temp) = create_test_logger();

        let batch: Vec<_> = Channel::ALL.iter().map(|c| entry(*c)).collect();
        logger.log_batch(&batch).unwrap();

        assert_eq!(logger.entry_count().unwrap(), 4);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();

        for channel in Channel::ALL {
            logger.log(&entry(channel)).unwrap();
        }

        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].channel, Channel::Dev);
        assert_eq!(recent[1].channel, Channel::Canary);
    }

    #[test]
    fn test_empty_journal() {
        let (logger, _temp) = create_test_logger();

        assert!(!logger.path().exists());
        assert!(logger.read_all().unwrap().is_empty());
        assert_eq!(logger.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let (logger, _temp) = create_test_logger();
        logger.log(&entry(Channel::Stable)).unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "not json").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
