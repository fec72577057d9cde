//! `channels`, `history` and `config` commands

use clap::Args;

use super::Session;
use crate::display::{format_channel_table, format_history};
use crate::error::BackupResult;
use crate::journal::JournalLogger;

/// Arguments of `edge-backup history`
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Print where every channel keeps its data
pub fn handle_channels_command(session: &Session) {
    println!("{}", format_channel_table(&session.context));
}

/// Print the most recent journal entries
pub fn handle_history_command(session: &Session, args: HistoryArgs) -> BackupResult<()> {
    let logger = JournalLogger::new(session.paths.journal_file());
    let entries = logger.read_recent(args.limit)?;
    println!("{}", format_history(&entries));
    Ok(())
}

/// Print the resolved configuration
pub fn handle_config_command(session: &Session) {
    let settings = &session.settings;
    let context = &session.context;

    println!("edge-backup Configuration");
    println!("=========================");
    println!("Settings file:       {}", session.paths.settings_file().display());
    println!("Journal:             {}", session.paths.journal_file().display());
    println!("Local app data:      {}", context.local_app_data.display());
    println!("User name:           {}", context.username);
    println!("Default destination: {}", context.default_destination.display());
    println!();
    println!("Settings:");
    println!("  Add date stamp:    {}", settings.add_date_stamp);
    println!("  Folders to clean:  {}", settings.folders_to_clean.join(", "));
    println!("  On failure:        {:?}", settings.channel_failure_policy);
    println!("  Log level:         {}", settings.log_level);
    println!("  Journal enabled:   {}", settings.journal_enabled);
}
