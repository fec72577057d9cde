//! `restore` and `verify` commands

use std::path::PathBuf;

use clap::Args;
use uuid::Uuid;

use super::Session;
use crate::backup::{validate_backup, RestoreManager};
use crate::error::BackupResult;
use crate::journal::{JournalEntry, Operation, Outcome};
use crate::models::{Channel, ExistingDataPolicy, RestoreRequest};

/// Arguments of `edge-backup restore`
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Archive produced by `backup` (.zip)
    #[arg(short, long)]
    pub archive: PathBuf,

    /// Registry export produced by `backup` (.reg)
    #[arg(short, long)]
    pub registry_file: PathBuf,

    /// What to do with the current User Data folder
    #[arg(short, long, value_enum)]
    pub existing_data: ExistingDataPolicy,

    /// Close the browser if it is running instead of aborting
    #[arg(long)]
    pub close_browser: bool,

    /// Channel to restore into
    #[arg(short, long, value_enum, default_value = "stable")]
    pub channel: Channel,
}

/// Arguments of `edge-backup verify`
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Archive to check (.zip)
    #[arg(short, long)]
    pub archive: PathBuf,

    /// Registry export to check (.reg)
    #[arg(short, long)]
    pub registry_file: PathBuf,
}

/// Handle the restore command
pub fn handle_restore_command(session: &Session, args: RestoreArgs) -> BackupResult<()> {
    let request = RestoreRequest {
        archive_path: args.archive,
        registry_file_path: args.registry_file,
        existing_data_policy: args.existing_data,
        close_browser_if_running: args.close_browser,
        channel: args.channel,
    };

    println!(
        "Restoring {} from {}...",
        request.channel,
        request.archive_path.display()
    );

    let result = RestoreManager::new(&session.context, &session.tools).restore(&request);

    // Precondition failures changed nothing and are not journaled.
    let artifacts = [request.archive_path.clone(), request.registry_file_path.clone()];
    let run_id = Uuid::new_v4();
    match &result {
        Err(err) if err.is_precondition() => {}
        Ok(done) => session.record(&[JournalEntry::new(
            run_id,
            Operation::Restore,
            request.channel,
            Outcome::Succeeded,
        )
        .with_artifacts(artifacts)
        .with_message(done.summary())]),
        Err(err) => session.record(&[JournalEntry::new(
            run_id,
            Operation::Restore,
            request.channel,
            Outcome::Failed,
        )
        .with_artifacts(artifacts)
        .with_message(err.to_string())]),
    }

    let done = result?;
    println!("{}", done.summary());
    println!("Restore complete: {}", done.restored_path.display());
    println!("Sign in to the browser again; sign-in tokens are not part of a backup.");

    Ok(())
}

/// Handle the verify command; returns whether the pair looks complete
pub fn handle_verify_command(session: &Session, args: VerifyArgs) -> BackupResult<bool> {
    let result = validate_backup(session.tools.archiver.as_ref(), &args.archive, &args.registry_file)?;

    println!("Backup Details");
    println!("==============");
    println!("Archive:  {}", args.archive.display());
    println!("Registry: {}", args.registry_file.display());
    println!("Entries:  {}", result.archive_entries);
    println!(
        "Top level: {}",
        result.top_level.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    println!();
    println!("Status: {}", result.summary());

    Ok(result.is_complete())
}
