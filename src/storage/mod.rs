//! Storage layer for passvault
//!
//! Every persisted artifact (salt, verifier, cooldown marker, vault
//! document) is a named blob behind the [`BlobStore`] port. The file-backed
//! store writes atomically; the in-memory store lets tests run without
//! touching a filesystem.

pub mod file_io;
pub mod memory;
pub mod records;
pub mod salt;

use std::sync::Arc;

pub use file_io::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use records::{EncryptedRecordStore, UpdateOutcome};
pub use salt::SaltStore;

use crate::error::VaultResult;

/// Raw 16-byte salt
pub const SALT_BLOB: &str = "salt.salt";

/// Hex commitment of the master key
pub const VERIFIER_BLOB: &str = "master.hash";

/// Timestamp marking the start of a lockout
pub const COOLDOWN_BLOB: &str = "cooldown.txt";

/// JSON document mapping entry name to ciphertext token
pub const VAULT_BLOB: &str = "passcode.json";

/// Whole-blob storage keyed by name.
///
/// Writes replace the blob entirely: a write either completes or leaves the
/// previous content in place.
pub trait BlobStore: Send + Sync {
    /// Read a blob, `None` if it does not exist
    fn read(&self, name: &str) -> VaultResult<Option<Vec<u8>>>;

    /// Replace a blob's content
    fn write(&self, name: &str, bytes: &[u8]) -> VaultResult<()>;

    /// Delete a blob, returning whether it existed
    fn delete(&self, name: &str) -> VaultResult<bool>;

    /// Check whether a blob exists
    fn exists(&self, name: &str) -> VaultResult<bool> {
        Ok(self.read(name)?.is_some())
    }
}

/// Storage handle shared by every vault component
pub type SharedStore = Arc<dyn BlobStore>;
