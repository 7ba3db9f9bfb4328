//! User settings for passvault
//!
//! Only the pause between wrong passphrases is configurable. The attempt
//! budget, the lockout window and the key derivation work factor are fixed
//! for every vault; stray keys for them in `config.json` are ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::error::VaultError;

/// Longest accepted pause between attempts
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Pacing of authentication attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutPolicy {
    /// Pause after a wrong passphrase, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_retry_delay_ms() -> u64 {
    2000
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl LockoutPolicy {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// User settings for passvault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub lockout: LockoutPolicy,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            lockout: LockoutPolicy::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, VaultError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| VaultError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| VaultError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), VaultError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| VaultError::Io(format!("Failed to write settings file: {}", e)))
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.lockout.retry_delay_ms > MAX_RETRY_DELAY_MS {
            return Err(VaultError::Config(format!(
                "lockout.retry_delay_ms must be at most {}",
                MAX_RETRY_DELAY_MS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.lockout.retry_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(Settings::load_or_create(&paths).unwrap(), Settings::default());
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.lockout.retry_delay_ms = 0;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"lockout": {}}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_budget_and_window_keys_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"lockout": {"max_attempts": 1000000, "retry_delay_ms": 0, "cooldown_secs": 1}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.lockout, LockoutPolicy { retry_delay_ms: 0 });

        let saved = serde_json::to_string(&loaded).unwrap();
        assert!(!saved.contains("max_attempts"));
        assert!(!saved.contains("cooldown_secs"));
    }

    #[test]
    fn test_excessive_delay_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"lockout": {"retry_delay_ms": 3600000}}"#,
        )
        .unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(VaultError::Config(_))
        ));
    }
}
