//! Salt persistence
//!
//! The salt is generated once, on first use, and read back unchanged on
//! every later run. Losing or replacing it makes every stored ciphertext
//! unrecoverable.

use tracing::info;

use crate::crypto::{Salt, SALT_LEN};
use crate::error::{VaultError, VaultResult};

use super::{SharedStore, SALT_BLOB};

/// Loads or creates the per-vault salt
pub struct SaltStore {
    store: SharedStore,
}

impl SaltStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Return the persisted salt, creating and saving a random one if absent
    pub fn get_or_create(&self) -> VaultResult<Salt> {
        if let Some(salt) = self.load()? {
            return Ok(salt);
        }

        let salt = Salt::generate();
        self.store.write(SALT_BLOB, salt.as_bytes())?;
        info!("created new vault salt");
        Ok(salt)
    }

    /// Return the persisted salt without creating one
    pub fn load(&self) -> VaultResult<Option<Salt>> {
        match self.store.read(SALT_BLOB)? {
            None => Ok(None),
            Some(bytes) => Salt::from_slice(&bytes).map(Some).ok_or_else(|| {
                VaultError::Storage(format!(
                    "Salt file is corrupted: expected {} bytes, got {}",
                    SALT_LEN,
                    bytes.len()
                ))
            }),
        }
    }
}
