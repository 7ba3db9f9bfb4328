//! File-backed blob store with atomic writes
//!
//! Each blob is a file under one directory. Writes go to a temp file that
//! is flushed and synced before being renamed over the target, so a crash
//! never leaves a half-written vault behind.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};

use super::BlobStore;

/// Blob store rooted at a directory on local disk
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path of a named blob
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, name: &str) -> VaultResult<Option<Vec<u8>>> {
        let path = self.path_of(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> VaultResult<()> {
        write_atomic(&self.path_of(name), bytes)
    }

    fn delete(&self, name: &str) -> VaultResult<bool> {
        let path = self.path_of(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VaultError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn exists(&self, name: &str) -> VaultResult<bool> {
        Ok(self.path_of(name).is_file())
    }
}

/// Write bytes to a file atomically (write to temp, then rename)
pub fn write_atomic(path: &Path, bytes: &[u8]) -> VaultResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            VaultError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let result = (|| {
        let mut file = File::create(&temp_path)
            .map_err(|e| VaultError::Storage(format!("Failed to create temp file: {}", e)))?;
        file.write_all(bytes)
            .map_err(|e| VaultError::Storage(format!("Failed to write data: {}", e)))?;
        file.flush()
            .map_err(|e| VaultError::Storage(format!("Failed to flush data: {}", e)))?;
        file.sync_all()
            .map_err(|e| VaultError::Storage(format!("Failed to sync data: {}", e)))?;
        fs::rename(&temp_path, path)
            .map_err(|e| VaultError::Storage(format!("Failed to rename temp file: {}", e)))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
