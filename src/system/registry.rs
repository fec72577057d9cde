//! Registry export/import through `reg.exe`
//!
//! The exported file is opaque to the rest of the crate: a path goes in and
//! success or failure comes out.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{BackupError, BackupResult};

/// Serializes a registry subtree to a file and back
pub trait RegistryTool {
    /// Export `key` and everything below it to `dest_file`
    ///
    /// `dest_file` must not exist yet.
    fn export(&self, key: &str, dest_file: &Path) -> BackupResult<()>;

    /// Import a file previously produced by [`RegistryTool::export`]
    fn import(&self, registry_file: &Path) -> BackupResult<()>;
}

/// Production [`RegistryTool`] shelling out to `reg.exe`
#[derive(Debug, Clone)]
pub struct RegCommand {
    program: String,
}

impl Default for RegCommand {
    fn default() -> Self {
        Self {
            program: "reg".to_string(),
        }
    }
}

impl RegCommand {
    pub fn new() -> Self {
        Self::default()
    }

    fn run(&self, args: &[&std::ffi::OsStr]) -> std::io::Result<Output> {
        Command::new(&self.program).args(args).output()
    }
}

/// Collapse a failed run's stderr (or stdout) into one line
fn describe_failure(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let text = if stderr.trim().is_empty() { stdout } else { stderr };
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    match output.status.code() {
        Some(code) if text.is_empty() => format!("exit code {}", code),
        Some(code) => format!("exit code {}: {}", code, text),
        None if text.is_empty() => "terminated by signal".to_string(),
        None => text,
    }
}

impl RegistryTool for RegCommand {
    fn export(&self, key: &str, dest_file: &Path) -> BackupResult<()> {
        let output = self
            .run(&["export".as_ref(), key.as_ref(), dest_file.as_os_str()])
            .map_err(|e| BackupError::Export(format!("Failed to launch {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(BackupError::Export(format!(
                "{} -> {}: {}",
                key,
                dest_file.display(),
                describe_failure(&output)
            )));
        }

        Ok(())
    }

    fn import(&self, registry_file: &Path) -> BackupResult<()> {
        let output = self
            .run(&["import".as_ref(), registry_file.as_os_str()])
            .map_err(|e| BackupError::Import(format!("Failed to launch {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(BackupError::Import(format!(
                "{}: {}",
                registry_file.display(),
                describe_failure(&output)
            )));
        }

        Ok(())
    }
}
