//! Custom error types for passvault
//!
//! This module defines the error hierarchy for the vault using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for passvault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Every allowed attempt used a wrong passphrase
    #[error("Authentication failed after {attempts} attempt(s)")]
    AuthenticationFailure { attempts: u32 },

    /// The cooldown window after exhausted attempts is still active
    #[error("Vault is locked. Wait {:.1} minutes before retrying", minutes(.remaining_secs))]
    LockedOut { remaining_secs: u64 },

    /// Entry name absent from the vault
    #[error("Entry not found: {name}")]
    NotFound { name: String },

    /// Ciphertext failed authentication (wrong key or tampered record)
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    /// Reading or writing a persisted blob failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// A master passphrase has already been set
    #[error("Vault is already initialized")]
    AlreadyInitialized,

    /// No master passphrase has been set yet
    #[error("Vault is not initialized")]
    NotInitialized,

    /// Invalid user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cipher setup or encryption failures
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl VaultError {
    /// Create a "not found" error for an entry name
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an integrity error
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Errors that should end the process rather than return to the menu
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Io(_) | Self::Json(_) | Self::Config(_)
        )
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

fn minutes(secs: &u64) -> f64 {
    *secs as f64 / 60.0
}

/// Result type alias for passvault operations
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = VaultError::not_found("example.com");
        assert_eq!(err.to_string(), "Entry not found: example.com");
        assert!(err.is_not_found());
        assert!(!err.is_integrity());
    }

    #[test]
    fn test_locked_out_message() {
        let err = VaultError::LockedOut { remaining_secs: 90 };
        assert_eq!(
            err.to_string(),
            "Vault is locked. Wait 1.5 minutes before retrying"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(VaultError::Storage("disk full".into()).is_fatal());
        assert!(!VaultError::not_found("x").is_fatal());
        assert!(!VaultError::Integrity("bad tag".into()).is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let vault_err: VaultError = io_err.into();
        assert!(matches!(vault_err, VaultError::Io(_)));
    }
}
