//! Diagnostic logging with tracing
//!
//! User-facing progress goes to stdout via `println!`; everything here goes
//! to stderr.

use tracing_subscriber::EnvFilter;

use crate::error::{BackupError, BackupResult};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "EDGE_BACKUP_LOG";

/// Build the filter: `EDGE_BACKUP_LOG`, else `debug` when verbose, else `default_level`
pub fn build_filter(default_level: &str, verbose: bool) -> BackupResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    let level = if verbose { "debug" } else { default_level };
    EnvFilter::try_new(level)
        .map_err(|e| BackupError::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber
pub fn init_logging(default_level: &str, verbose: bool) -> BackupResult<()> {
    let filter = build_filter(default_level, verbose)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| BackupError::Config(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_levels() {
        for level in ["trace", "debug", "info", "warn", "error", "edgebackup=debug"] {
            assert!(build_filter(level, false).is_ok(), "{}", level);
        }
    }

    #[test]
    fn test_invalid_level() {
        if std::env::var(LOG_ENV).is_err() {
            assert!(build_filter("edgebackup=loud", false).is_err());
        }
    }
}
