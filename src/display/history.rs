//! Journal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::journal::JournalEntry;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Result")]
    outcome: String,
    #[tabled(rename = "Details")]
    details: String,
}

fn details(entry: &JournalEntry) -> String {
    if let Some(message) = &entry.message {
        return message.clone();
    }
    entry
        .artifacts
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format journal entries as a table, newest last
pub fn format_history(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No backup or restore runs recorded yet.".to_string();
    }

    let rows: Vec<HistoryRow> = entries
        .iter()
        .map(|entry| HistoryRow {
            when: entry
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            operation: entry.operation.to_string(),
            channel: entry.channel.to_string(),
            outcome: entry.outcome.to_string(),
            details: details(entry),
        })
        .collect();

    Table::new(rows).with(Style::sharp()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{Operation, Outcome};
    use crate::models::Channel;
    use uuid::Uuid;

    #[test]
    fn test_empty_history() {
        assert!(format_history(&[]).contains("No backup"));
    }

    #[test]
    fn test_rows_show_artifact_names_or_message() {
        let run = Uuid::new_v4();
        let entries = vec![
            JournalEntry::new(run, Operation::Backup, Channel::Stable, Outcome::Succeeded)
                .with_artifacts(["/b/Edge-UserData-alice.zip", "/b/Edge-ProfilesRegistry-alice.reg"]),
            JournalEntry::new(run, Operation::Backup, Channel::Beta, Outcome::Failed)
                .with_message("Profile folder not found"),
        ];

        let table = format_history(&entries);
        assert!(table.contains("Edge-UserData-alice.zip"));
        assert!(table.contains("Profile folder not found"));
        assert!(table.contains("BACKUP"));
    }
}
