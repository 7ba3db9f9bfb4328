//! Path management for passvault
//!
//! ## Path Resolution Order
//!
//! 1. Explicit directory (the `--data-dir` flag)
//! 2. `PASSVAULT_DATA_DIR` environment variable (if set)
//! 3. The platform config directory (`~/.config/passvault` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::VaultError;
use crate::storage::{COOLDOWN_BLOB, SALT_BLOB, VAULT_BLOB, VERIFIER_BLOB};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PASSVAULT_DATA_DIR";

/// Manages all paths used by passvault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Base directory for all passvault data
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Resolve paths from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create VaultPaths with a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding the vault blobs
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn salt_file(&self) -> PathBuf {
        self.data_dir().join(SALT_BLOB)
    }

    pub fn verifier_file(&self) -> PathBuf {
        self.data_dir().join(VERIFIER_BLOB)
    }

    pub fn cooldown_file(&self) -> PathBuf {
        self.data_dir().join(COOLDOWN_BLOB)
    }

    pub fn vault_file(&self) -> PathBuf {
        self.data_dir().join(VAULT_BLOB)
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| VaultError::Io(format!("Failed to create data directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, VaultError> {
    ProjectDirs::from("", "", "passvault")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| VaultError::Config("Could not determine a home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_blob_paths_live_in_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let data = temp_dir.path().join("data");

        assert_eq!(paths.salt_file(), data.join("salt.salt"));
        assert_eq!(paths.verifier_file(), data.join("master.hash"));
        assert_eq!(paths.cooldown_file(), data.join("cooldown.txt"));
        assert_eq!(paths.vault_file(), data.join("passcode.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().join("vault"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().is_dir());
    }
}
