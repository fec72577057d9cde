//! In-memory collaborators for orchestrator tests

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{Archiver, ProcessControl, RegistryTool, Toolkit, ZipArchiver};
use crate::error::{BackupError, BackupResult};

/// Stops "running" on terminate unless `ignore_terminate` is set
pub struct FakeProcesses {
    pub running: Cell<bool>,
    /// Shared so it can still be read once the fake is boxed into a [`Toolkit`]
    pub terminations: Rc<Cell<u32>>,
    pub ignore_terminate: bool,
}

impl FakeProcesses {
    pub fn new(running: bool) -> Self {
        Self {
            running: Cell::new(running),
            terminations: Rc::new(Cell::new(0)),
            ignore_terminate: false,
        }
    }
}

impl ProcessControl for FakeProcesses {
    fn is_running(&self, _name: &str) -> BackupResult<bool> {
        Ok(self.running.get())
    }

    fn terminate(&self, _name: &str) -> BackupResult<()> {
        self.terminations.set(self.terminations.get() + 1);
        if !self.ignore_terminate {
            self.running.set(false);
        }
        Ok(())
    }
}

/// Calls seen by a [`FakeRegistry`]
#[derive(Debug, Default)]
pub struct RegistryCalls {
    pub exports: Vec<(String, PathBuf)>,
    pub imports: Vec<PathBuf>,
}

/// Writes a stand-in export file; can be told to fail either direction
pub struct FakeRegistry {
    pub calls: Rc<RefCell<RegistryCalls>>,
    pub fail_export: bool,
    pub fail_import: bool,
    /// Fail only the export of this key
    pub fail_export_key: Option<String>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(RegistryCalls::default())),
            fail_export: false,
            fail_import: false,
            fail_export_key: None,
        }
    }
}

impl RegistryTool for FakeRegistry {
    fn export(&self, key: &str, dest_file: &Path) -> BackupResult<()> {
        assert!(!dest_file.exists(), "export target must be cleared first");
        self.calls
            .borrow_mut()
            .exports
            .push((key.to_string(), dest_file.to_path_buf()));

        // Leave a partial file behind on failure, like a crashed export would.
        fs::write(dest_file, format!("Windows Registry Editor Version 5.00\r\n\r\n[{}]\r\n", key))?;
        if self.fail_export || self.fail_export_key.as_deref() == Some(key) {
            return Err(BackupError::Export(format!("fake export of {} failed", key)));
        }
        Ok(())
    }

    fn import(&self, registry_file: &Path) -> BackupResult<()> {
        self.calls.borrow_mut().imports.push(registry_file.to_path_buf());
        if self.fail_import {
            return Err(BackupError::Import("fake import failed".into()));
        }
        Ok(())
    }
}

/// A real [`ZipArchiver`] that can be told to fail after writing partial output
#[derive(Default)]
pub struct FlakyArchiver {
    pub fail_compress: bool,
    pub fail_decompress: bool,
}

impl Archiver for FlakyArchiver {
    fn compress(&self, source_root: &Path, dest_archive: &Path) -> BackupResult<usize> {
        if self.fail_compress {
            fs::write(dest_archive, b"PK\x03\x04partial")?;
            return Err(BackupError::Compression("fake compression failure".into()));
        }
        ZipArchiver::new().compress(source_root, dest_archive)
    }

    fn decompress(&self, source_archive: &Path, dest_root: &Path) -> BackupResult<usize> {
        if self.fail_decompress {
            let partial = dest_root.join("User Data").join("Default");
            fs::create_dir_all(&partial)?;
            fs::write(partial.join("half-written"), b"x")?;
            fs::write(dest_root.join("First Run"), b"")?;
            return Err(BackupError::Decompression("fake decompression failure".into()));
        }
        ZipArchiver::new().decompress(source_archive, dest_root)
    }

    fn list_entries(&self, source_archive: &Path) -> BackupResult<Vec<String>> {
        ZipArchiver::new().list_entries(source_archive)
    }
}

/// A toolkit around the given fakes
pub fn toolkit(registry: FakeRegistry, archiver: FlakyArchiver, processes: FakeProcesses) -> Toolkit {
    Toolkit {
        registry: Box::new(registry),
        archiver: Box::new(archiver),
        processes: Box::new(processes),
    }
}

/// Make `dir` read-only so nothing inside it can be removed
///
/// Returns false, leaving `dir` writable, when permissions are not
/// enforced (for example when the tests run as root).
#[cfg(unix)]
pub fn lock_dir(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(0o555)).unwrap();
    let check = dir.join(".write-check");
    if fs::write(&check, b"").is_ok() {
        let _ = fs::remove_file(&check);
        unlock_dir(dir);
        return false;
    }
    true
}

/// Undo [`lock_dir`] so the temp dir can be cleaned up
#[cfg(unix)]
pub fn unlock_dir(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}
