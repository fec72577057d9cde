//! `backup` command

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Args;
use uuid::Uuid;

use super::Session;
use crate::backup::{BackupManager, ChannelStatus};
use crate::display::format_backup_report;
use crate::error::BackupResult;
use crate::journal::{JournalEntry, Operation, Outcome};
use crate::models::{BackupRequest, Channel, ChannelFailurePolicy};

/// Arguments of `edge-backup backup`
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Folder to write the archive and registry export to
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Leave the date stamp out of artifact names
    #[arg(long)]
    pub no_date: bool,

    /// Folder names to empty before archiving (repeatable)
    #[arg(long = "clean", value_name = "NAME", conflicts_with = "no_clean")]
    pub clean: Vec<String>,

    /// Do not empty any folders before archiving
    #[arg(long)]
    pub no_clean: bool,

    /// Close the browser if it is running instead of aborting
    #[arg(long)]
    pub close_browser: bool,

    /// Channels to back up (repeatable or comma-separated)
    #[arg(short, long = "channel", value_enum, value_delimiter = ',', default_value = "stable")]
    pub channels: Vec<Channel>,

    /// Stop at the first channel that fails
    #[arg(long)]
    pub stop_on_failure: bool,
}

impl BackupArgs {
    /// Fill in anything not given on the command line from settings
    pub fn into_request(self, session: &Session) -> BackupRequest {
        let folders_to_clean: BTreeSet<String> = if self.no_clean {
            BTreeSet::new()
        } else if self.clean.is_empty() {
            session.settings.folders_to_clean.iter().cloned().collect()
        } else {
            self.clean.into_iter().collect()
        };

        let failure_policy = if self.stop_on_failure {
            ChannelFailurePolicy::Abort
        } else {
            session.settings.channel_failure_policy
        };

        BackupRequest {
            destination: self
                .destination
                .unwrap_or_else(|| session.context.default_destination.clone()),
            add_date_stamp: session.settings.add_date_stamp && !self.no_date,
            folders_to_clean,
            close_browser_if_running: self.close_browser,
            channels: self.channels,
            failure_policy,
        }
    }
}

/// Handle the backup command; returns whether every channel succeeded
pub fn handle_backup_command(session: &Session, args: BackupArgs) -> BackupResult<bool> {
    let request = args.into_request(session);

    println!(
        "Backing up {} to {}...",
        request
            .unique_channels()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        request.destination.display()
    );

    let report = BackupManager::new(&session.context, &session.tools).run(&request)?;

    let run_id = Uuid::new_v4();
    let entries: Vec<JournalEntry> = report
        .channels
        .iter()
        .map(|(channel, status)| match status {
            ChannelStatus::Completed(done) => {
                JournalEntry::new(run_id, Operation::Backup, *channel, Outcome::Succeeded)
                    .with_artifacts(done.artifacts.paths())
            }
            ChannelStatus::Failed(err) => {
                JournalEntry::new(run_id, Operation::Backup, *channel, Outcome::Failed)
                    .with_message(err.to_string())
            }
            ChannelStatus::Skipped => {
                JournalEntry::new(run_id, Operation::Backup, *channel, Outcome::Skipped)
            }
        })
        .collect();
    session.record(&entries);

    print!("{}", format_backup_report(&report));

    if report.all_succeeded() {
        println!("Backup complete: {}", report.destination.display());
    } else {
        println!("Backup finished with errors.");
    }

    Ok(report.all_succeeded())
}
