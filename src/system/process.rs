//! Process queries keyed by image name

#[cfg(windows)]
use std::process::Command;

#[cfg(windows)]
use crate::error::BackupError;
use crate::error::BackupResult;

/// Asks whether a process is running and stops it on request
pub trait ProcessControl {
    /// Whether any process with image name `name` is running
    fn is_running(&self, name: &str) -> BackupResult<bool>;

    /// Forcefully stop every process with image name `name`
    fn terminate(&self, name: &str) -> BackupResult<()>;
}

/// Production [`ProcessControl`] using `tasklist` and `taskkill`
///
/// On platforms without those tools the browser is reported as not running.
#[derive(Debug, Clone, Default)]
pub struct TaskList;

impl TaskList {
    pub fn new() -> Self {
        Self
    }
}

/// Whether `tasklist /FO CSV /NH` output lists `name`
#[cfg_attr(not(windows), allow(dead_code))]
fn csv_lists_image(stdout: &str, name: &str) -> bool {
    let prefix = format!("\"{}\"", name.to_ascii_lowercase());
    stdout
        .lines()
        .map(str::trim)
        .any(|line| line.to_ascii_lowercase().starts_with(&prefix))
}

#[cfg(windows)]
impl ProcessControl for TaskList {
    fn is_running(&self, name: &str) -> BackupResult<bool> {
        let filter = format!("IMAGENAME eq {}", name);
        let output = Command::new("tasklist")
            .args(["/FI", &filter, "/FO", "CSV", "/NH"])
            .output()
            .map_err(|e| BackupError::Io(format!("Failed to run tasklist: {}", e)))?;

        if !output.status.success() {
            return Err(BackupError::Io(format!(
                "tasklist exited with {}",
                output.status
            )));
        }

        Ok(csv_lists_image(&String::from_utf8_lossy(&output.stdout), name))
    }

    fn terminate(&self, name: &str) -> BackupResult<()> {
        let output = Command::new("taskkill")
            .args(["/F", "/T", "/IM", name])
            .output()
            .map_err(|e| BackupError::Io(format!("Failed to run taskkill: {}", e)))?;

        // taskkill exits non-zero when the process vanished on its own; the
        // caller re-checks, so only launch failures are errors here.
        if !output.status.success() {
            tracing::debug!(
                process = name,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "taskkill reported failure"
            );
        }

        Ok(())
    }
}

#[cfg(not(windows))]
impl ProcessControl for TaskList {
    fn is_running(&self, _name: &str) -> BackupResult<bool> {
        Ok(false)
    }

    fn terminate(&self, _name: &str) -> BackupResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_lists_image() {
        let stdout = "\"msedge.exe\",\"1234\",\"Console\",\"1\",\"120,000 K\"\r\n\
                      \"MSEdge.exe\",\"5678\",\"Console\",\"1\",\"80,000 K\"\r\n";
        assert!(csv_lists_image(stdout, "msedge.exe"));
    }

    #[test]
    fn test_csv_no_match() {
        let stdout = "INFO: No tasks are running which match the specified criteria.\r\n";
        assert!(!csv_lists_image(stdout, "msedge.exe"));
        assert!(!csv_lists_image("\"msedgewebview2.exe\",\"1\"", "msedge.exe"));
    }
}
