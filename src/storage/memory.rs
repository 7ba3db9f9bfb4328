//! In-memory blob store.
//!
//! Not persistent; used by tests and anywhere a vault should not touch disk.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{VaultError, VaultResult};

use super::BlobStore;

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> VaultResult<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.blobs
            .lock()
            .map_err(|e| VaultError::Storage(format!("Failed to acquire lock: {}", e)))
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, name: &str) -> VaultResult<Option<Vec<u8>>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn write(&self, name: &str, bytes: &[u8]) -> VaultResult<()> {
        self.lock()?.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, name: &str) -> VaultResult<bool> {
        Ok(self.lock()?.remove(name).is_some())
    }

    fn exists(&self, name: &str) -> VaultResult<bool> {
        Ok(self.lock()?.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemoryBlobStore::new();
        assert!(store.read("a").unwrap().is_none());

        store.write("a", b"1").unwrap();
        assert!(store.exists("a").unwrap());
        assert_eq!(store.read("a").unwrap().unwrap(), b"1");

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
    }
}
