//! Backup run summaries

use crate::backup::{BackupReport, ChannelStatus};

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format the per-channel outcome of a backup run
pub fn format_backup_report(report: &BackupReport) -> String {
    let mut output = String::new();

    for (channel, status) in &report.channels {
        match status {
            ChannelStatus::Completed(done) => {
                let size = std::fs::metadata(&done.artifacts.archive_file)
                    .map(|m| format_size(m.len()))
                    .unwrap_or_else(|_| "?".to_string());
                output.push_str(&format!(
                    "{}: backed up ({} entries, {})\n",
                    channel, done.archived_entries, size
                ));
                output.push_str(&format!(
                    "  Archive:  {}\n",
                    done.artifacts.archive_file.display()
                ));
                output.push_str(&format!(
                    "  Registry: {}\n",
                    done.artifacts.registry_file.display()
                ));
                if done.clean.folders_matched > 0 {
                    output.push_str(&format!(
                        "  Cleared {} item(s) from {} folder(s)\n",
                        done.clean.entries_removed, done.clean.folders_matched
                    ));
                }
                if !done.clean.is_clean() {
                    output.push_str(&format!(
                        "  {} item(s) could not be cleared (see log)\n",
                        done.clean.failures.len()
                    ));
                }
            }
            ChannelStatus::Failed(err) => {
                output.push_str(&format!("{}: FAILED - {}\n", channel, err));
            }
            ChannelStatus::Skipped => {
                output.push_str(&format!("{}: skipped after earlier failure\n", channel));
            }
        }
    }

    output
}
