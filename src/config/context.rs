//! Per-user context resolved once at startup
//!
//! Everything the orchestrators would otherwise read from the ambient
//! environment (local app data root, user name, default destination) lives
//! here so it can be constructed explicitly in tests.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};

use super::settings::Settings;
use crate::error::BackupError;

/// Overrides the local application data root
pub const LOCAL_APP_DATA_ENV: &str = "EDGE_BACKUP_LOCAL_APP_DATA";
/// Overrides the user name embedded in artifact names
pub const USERNAME_ENV: &str = "EDGE_BACKUP_USERNAME";

const DEFAULT_DESTINATION_DIR: &str = "EdgeProfileBackups";

/// The user whose profile is backed up or restored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// Root under which `Microsoft\Edge*` profile folders live
    pub local_app_data: PathBuf,
    /// Account name embedded in artifact file names
    pub username: String,
    /// Destination used when the caller does not supply one
    pub default_destination: PathBuf,
}

impl UserContext {
    /// Build a context from explicit values
    pub fn new(
        local_app_data: impl Into<PathBuf>,
        username: impl Into<String>,
        default_destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            local_app_data: local_app_data.into(),
            username: username.into(),
            default_destination: default_destination.into(),
        }
    }

    /// Resolve the context from the process environment
    pub fn from_env(settings: &Settings) -> Result<Self, BackupError> {
        Self::resolve(|key| std::env::var(key).ok(), settings)
    }

    /// Resolve the context using `lookup` for environment variables
    ///
    /// Resolution:
    /// 1. `EDGE_BACKUP_LOCAL_APP_DATA`, else the platform local data dir
    /// 2. `EDGE_BACKUP_USERNAME`, else `USERNAME`, else `USER`
    /// 3. `settings.default_destination`, else `<Documents>/EdgeProfileBackups`
    pub fn resolve<F>(lookup: F, settings: &Settings) -> Result<Self, BackupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let local_app_data = match non_empty(LOCAL_APP_DATA_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => BaseDirs::new()
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .ok_or_else(|| {
                    BackupError::Config("Could not determine the local app data directory".into())
                })?,
        };

        let username = non_empty(USERNAME_ENV)
            .or_else(|| non_empty("USERNAME"))
            .or_else(|| non_empty("USER"))
            .ok_or_else(|| BackupError::Config("Could not determine the current user name".into()))?;

        let default_destination = match &settings.default_destination {
            Some(path) => path.clone(),
            None => default_destination_root()?.join(DEFAULT_DESTINATION_DIR),
        };

        Ok(Self {
            local_app_data,
            username,
            default_destination,
        })
    }

    /// Check whether `path` is this context's default destination
    pub fn is_default_destination(&self, path: &Path) -> bool {
        path == self.default_destination
    }
}

fn default_destination_root() -> Result<PathBuf, BackupError> {
    if let Some(documents) = UserDirs::new().and_then(|dirs| dirs.document_dir().map(Path::to_path_buf)) {
        return Ok(documents);
    }
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| BackupError::Config("Could not determine a home directory".into()))
}
