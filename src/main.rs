use anyhow::Result;
use clap::{Parser, Subcommand};

use edgebackup::cli::{
    handle_backup_command, handle_channels_command, handle_config_command,
    handle_history_command, handle_restore_command, handle_verify_command, BackupArgs,
    HistoryArgs, RestoreArgs, Session, VerifyArgs,
};
use edgebackup::config::{Settings, ToolPaths, UserContext};
use edgebackup::logging::init_logging;
use edgebackup::system::Toolkit;

#[derive(Parser)]
#[command(
    name = "edge-backup",
    version,
    about = "Back up and restore Microsoft Edge profiles",
    long_about = "edge-backup snapshots a Microsoft Edge channel's User Data folder \
                  and its PreferenceMACs registry subtree into a zip archive and a \
                  .reg export, and restores them onto a machine later."
)]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up one or more channels
    Backup(BackupArgs),

    /// Restore a channel from an archive and registry export
    Restore(RestoreArgs),

    /// Check that an archive and registry export look usable
    Verify(VerifyArgs),

    /// Show where each channel keeps its data
    Channels,

    /// Show recent backup and restore runs
    History(HistoryArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ToolPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings.log_level, cli.verbose)?;

    let context = UserContext::from_env(&settings)?;
    tracing::debug!(
        local_app_data = %context.local_app_data.display(),
        user = %context.username,
        "resolved user context"
    );

    let session = Session {
        paths,
        settings,
        context,
        tools: Toolkit::system(),
    };

    let succeeded = match cli.command {
        Some(Commands::Backup(args)) => handle_backup_command(&session, args)?,
        Some(Commands::Restore(args)) => {
            handle_restore_command(&session, args)?;
            true
        }
        Some(Commands::Verify(args)) => handle_verify_command(&session, args)?,
        Some(Commands::Channels) => {
            handle_channels_command(&session);
            true
        }
        Some(Commands::History(args)) => {
            handle_history_command(&session, args)?;
            true
        }
        Some(Commands::Config) => {
            handle_config_command(&session);
            true
        }
        None => {
            println!("edge-backup - Microsoft Edge profile backup and restore");
            println!();
            println!("Run 'edge-backup --help' for usage information.");
            true
        }
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}
