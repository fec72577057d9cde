//! Zip archives of a profile tree

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{BackupError, BackupResult};

const ZIP_COPY_BUFFER_SIZE: usize = 256 * 1024;

/// Packs a directory tree into an archive file and unpacks it again
pub trait Archiver {
    /// Archive every top-level child of `source_root` into `dest_archive`
    ///
    /// Entry names are relative to `source_root`. `dest_archive` must not
    /// exist yet. Returns the number of entries written.
    fn compress(&self, source_root: &Path, dest_archive: &Path) -> BackupResult<usize>;

    /// Extract `source_archive` below `dest_root`, overwriting existing files
    ///
    /// Returns the number of entries extracted.
    fn decompress(&self, source_archive: &Path, dest_root: &Path) -> BackupResult<usize>;

    /// List entry names without extracting
    fn list_entries(&self, source_archive: &Path) -> BackupResult<Vec<String>>;
}

/// Production [`Archiver`] writing Deflate-compressed zip files
#[derive(Debug, Clone, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

fn copy_with_reused_buffer<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut [u8],
) -> io::Result<u64> {
    let mut written = 0_u64;

    loop {
        let read = reader.read(buffer)?;
        if read == 0 {
            break;
        }

        writer.write_all(&buffer[..read])?;
        written += read as u64;
    }

    Ok(written)
}

/// Zip entry name for `path` below `root`, always `/`-separated
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn top_level_children(root: &Path) -> BackupResult<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| {
        BackupError::Compression(format!("Failed to read {}: {}", root.display(), e))
    })? {
        let entry = entry.map_err(|e| {
            BackupError::Compression(format!("Failed to read directory entry: {}", e))
        })?;
        children.push(entry.path());
    }
    children.sort();
    Ok(children)
}

impl Archiver for ZipArchiver {
    fn compress(&self, source_root: &Path, dest_archive: &Path) -> BackupResult<usize> {
        let children = top_level_children(source_root)?;

        let output_file = File::create(dest_archive).map_err(|e| {
            BackupError::Compression(format!(
                "Failed to create archive '{}': {}",
                dest_archive.display(),
                e
            ))
        })?;
        let mut zip = ZipWriter::new(BufWriter::with_capacity(ZIP_COPY_BUFFER_SIZE, output_file));
        let dir_options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut copy_buffer = vec![0_u8; ZIP_COPY_BUFFER_SIZE];
        let mut written = 0_usize;

        for child in &children {
            for entry in WalkDir::new(child).follow_links(false) {
                let entry = entry.map_err(|e| {
                    BackupError::Compression(format!("Failed to walk profile tree: {}", e))
                })?;
                let path = entry.path();
                let Some(name) = entry_name(source_root, path) else {
                    continue;
                };

                if entry.file_type().is_dir() {
                    zip.add_directory(name.as_str(), dir_options).map_err(|e| {
                        BackupError::Compression(format!("Failed to add directory '{}': {}", name, e))
                    })?;
                } else if entry.file_type().is_file() {
                    let mut input = File::open(path).map_err(|e| {
                        BackupError::Compression(format!(
                            "Failed to open '{}': {}",
                            path.display(),
                            e
                        ))
                    })?;
                    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    let options = SimpleFileOptions::default()
                        .compression_method(CompressionMethod::Deflated)
                        .large_file(size >= u64::from(u32::MAX));

                    zip.start_file(name.as_str(), options).map_err(|e| {
                        BackupError::Compression(format!("Failed to start entry '{}': {}", name, e))
                    })?;
                    copy_with_reused_buffer(&mut input, &mut zip, &mut copy_buffer).map_err(|e| {
                        BackupError::Compression(format!("Failed to write entry '{}': {}", name, e))
                    })?;
                } else {
                    // Symlinks and other special files are not archived.
                    tracing::debug!(path = %path.display(), "skipping non-regular file");
                    continue;
                }
                written += 1;
            }
        }

        let mut writer = zip
            .finish()
            .map_err(|e| BackupError::Compression(format!("Failed to finalize archive: {}", e)))?;
        writer
            .flush()
            .map_err(|e| BackupError::Compression(format!("Failed to flush archive: {}", e)))?;

        Ok(written)
    }

    fn decompress(&self, source_archive: &Path, dest_root: &Path) -> BackupResult<usize> {
        // Every entry goes through enclosed_name to refuse zip-slip paths.
        let file = File::open(source_archive)
            .map_err(|e| BackupError::Decompression(format!("Failed to open archive: {}", e)))?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| BackupError::Decompression(format!("Invalid zip archive: {}", e)))?;

        fs::create_dir_all(dest_root).map_err(|e| {
            BackupError::Decompression(format!("Failed to create extraction directory: {}", e))
        })?;

        let total = archive.len();
        let mut copy_buffer = vec![0_u8; ZIP_COPY_BUFFER_SIZE];
        let mut created_dirs = HashSet::<PathBuf>::new();
        created_dirs.insert(dest_root.to_path_buf());

        for i in 0..total {
            let mut entry = archive.by_index(i).map_err(|e| {
                BackupError::Decompression(format!("Failed to read entry {}: {}", i, e))
            })?;

            let enclosed = entry.enclosed_name().ok_or_else(|| {
                BackupError::Decompression(format!("Refused unsafe entry path: {}", entry.name()))
            })?;

            let output_path = dest_root.join(enclosed);
            if entry.is_dir() {
                if created_dirs.insert(output_path.clone()) {
                    fs::create_dir_all(&output_path).map_err(|e| {
                        BackupError::Decompression(format!("Failed to create directory: {}", e))
                    })?;
                }
                continue;
            }

            if let Some(parent) = output_path.parent() {
                if created_dirs.insert(parent.to_path_buf()) {
                    fs::create_dir_all(parent).map_err(|e| {
                        BackupError::Decompression(format!(
                            "Failed to create parent directory: {}",
                            e
                        ))
                    })?;
                }
            }

            let output_file = File::create(&output_path).map_err(|e| {
                BackupError::Decompression(format!(
                    "Failed to create '{}': {}",
                    output_path.display(),
                    e
                ))
            })?;
            let mut output = BufWriter::with_capacity(ZIP_COPY_BUFFER_SIZE, output_file);
            copy_with_reused_buffer(&mut entry, &mut output, &mut copy_buffer).map_err(|e| {
                BackupError::Decompression(format!("Failed to extract '{}': {}", entry.name(), e))
            })?;
            output.flush().map_err(|e| {
                BackupError::Decompression(format!("Failed to flush extracted file: {}", e))
            })?;
        }

        Ok(total)
    }

    fn list_entries(&self, source_archive: &Path) -> BackupResult<Vec<String>> {
        let file = File::open(source_archive)
            .map_err(|e| BackupError::Decompression(format!("Failed to open archive: {}", e)))?;
        let archive = ZipArchive::new(file)
            .map_err(|e| BackupError::Decompression(format!("Invalid zip archive: {}", e)))?;

        Ok(archive.file_names().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("User Data/Default/Cache")).unwrap();
        fs::create_dir_all(root.join("User Data/Profile 1")).unwrap();
        fs::write(root.join("User Data/Local State"), b"{}").unwrap();
        fs::write(root.join("User Data/Default/Bookmarks"), b"bookmarks").unwrap();
        fs::write(root.join("Top File"), b"top").unwrap();
    }

    #[test]
    fn test_compress_then_decompress_reproduces_tree() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("Edge");
        build_tree(&source);
        let archive = temp.path().join("out.zip");

        let archiver = ZipArchiver::new();
        let written = archiver.compress(&source, &archive).unwrap();
        assert!(written >= 7);

        let dest = temp.path().join("restored");
        let extracted = archiver.decompress(&archive, &dest).unwrap();
        assert_eq!(extracted, written);

        assert!(dest.join("User Data/Default/Cache").is_dir());
        assert!(dest.join("User Data/Profile 1").is_dir());
        assert_eq!(
            fs::read(dest.join("User Data/Default/Bookmarks")).unwrap(),
            b"bookmarks"
        );
        assert_eq!(fs::read(dest.join("Top File")).unwrap(), b"top");
    }

    #[test]
    fn test_entry_names_are_relative_and_slash_separated() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("Edge");
        build_tree(&source);
        let archive = temp.path().join("out.zip");

        let archiver = ZipArchiver::new();
        archiver.compress(&source, &archive).unwrap();
        let names = archiver.list_entries(&archive).unwrap();

        assert!(names.iter().any(|n| n == "User Data/Default/Bookmarks"));
        assert!(names.iter().all(|n| !n.starts_with("Edge")));
        assert!(names.iter().all(|n| !n.contains('\\')));
    }

    #[test]
    fn test_decompress_overwrites_existing_files() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("Edge");
        build_tree(&source);
        let archive = temp.path().join("out.zip");
        let archiver = ZipArchiver::new();
        archiver.compress(&source, &archive).unwrap();

        let dest = temp.path().join("restored");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("Top File"), b"stale contents that are longer").unwrap();

        archiver.decompress(&archive, &dest).unwrap();
        assert_eq!(fs::read(dest.join("Top File")).unwrap(), b"top");
    }

    #[test]
    fn test_decompress_rejects_non_zip() {
        let temp = TempDir::new().unwrap();
        let bogus = temp.path().join("bogus.zip");
        fs::write(&bogus, b"not a zip").unwrap();

        let err = ZipArchiver::new()
            .decompress(&bogus, &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, BackupError::Decompression(_)));
    }

    #[test]
    fn test_compress_missing_source_is_compression_error() {
        let temp = TempDir::new().unwrap();
        let err = ZipArchiver::new()
            .compress(&temp.path().join("missing"), &temp.path().join("out.zip"))
            .unwrap_err();
        assert!(matches!(err, BackupError::Compression(_)));
        assert!(!temp.path().join("out.zip").exists());
    }
}
