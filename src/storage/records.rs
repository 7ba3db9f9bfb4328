//! Encrypted record store
//!
//! The vault document is a JSON object mapping entry name to ciphertext
//! token. Every mutation reads the whole mapping, changes it in memory and
//! writes the whole mapping back.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::crypto::{decrypt_string, encrypt_string, EncryptedData, MasterKey, SecureString};
use crate::error::{VaultError, VaultResult};

use super::{SharedStore, VAULT_BLOB};

/// Entry name to ciphertext token
pub type RecordMap = BTreeMap<String, String>;

/// Result of [`EncryptedRecordStore::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// An existing entry was overwritten
    Updated,
    /// The entry was absent and creation was confirmed
    Created,
    /// The entry was absent and creation was not confirmed; nothing changed
    Cancelled,
}

/// Authenticated-encryption layer over the persisted vault document
pub struct EncryptedRecordStore {
    store: SharedStore,
}

impl EncryptedRecordStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Load every entry. A missing or blank document is an empty vault.
    pub fn load_all(&self) -> VaultResult<RecordMap> {
        let Some(bytes) = self.store.read(VAULT_BLOB)? else {
            return Ok(RecordMap::new());
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RecordMap::new());
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| VaultError::Storage(format!("Failed to parse {}: {}", VAULT_BLOB, e)))
    }

    fn save_all(&self, records: &RecordMap) -> VaultResult<()> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| VaultError::Storage(format!("Failed to serialize vault: {}", e)))?;
        self.store.write(VAULT_BLOB, &json)
    }

    /// Encrypt `plaintext` under `key` and insert or overwrite `name`
    pub fn put(&self, name: &str, plaintext: &SecureString, key: &MasterKey) -> VaultResult<()> {
        let token = encrypt_string(plaintext, key)?.to_token();

        let mut records = self.load_all()?;
        records.insert(name.to_string(), token);
        self.save_all(&records)?;

        info!(entry = name, "stored entry");
        Ok(())
    }

    /// Decrypt the entry stored under `name`
    pub fn get(&self, name: &str, key: &MasterKey) -> VaultResult<SecureString> {
        let records = self.load_all()?;
        let token = records.get(name).ok_or_else(|| VaultError::not_found(name))?;

        let encrypted = EncryptedData::from_token(token)?;
        let plaintext = decrypt_string(&encrypted, key).map_err(|e| {
            debug!(entry = name, error = %e, "entry failed to decrypt");
            e
        })?;
        Ok(SecureString::new(plaintext))
    }

    /// Remove `name`, returning whether anything was removed.
    ///
    /// The document is only rewritten when an entry was actually removed.
    pub fn delete(&self, name: &str) -> VaultResult<bool> {
        let mut records = self.load_all()?;
        if records.remove(name).is_none() {
            return Ok(false);
        }

        self.save_all(&records)?;
        info!(entry = name, "removed entry");
        Ok(true)
    }

    /// Overwrite `name`, or create it only if `confirm_create_if_absent` is set
    pub fn update(
        &self,
        name: &str,
        plaintext: &SecureString,
        key: &MasterKey,
        confirm_create_if_absent: bool,
    ) -> VaultResult<UpdateOutcome> {
        let mut records = self.load_all()?;
        let existed = records.contains_key(name);
        if !existed && !confirm_create_if_absent {
            return Ok(UpdateOutcome::Cancelled);
        }

        let token = encrypt_string(plaintext, key)?.to_token();
        records.insert(name.to_string(), token);
        self.save_all(&records)?;

        if existed {
            info!(entry = name, "updated entry");
            Ok(UpdateOutcome::Updated)
        } else {
            info!(entry = name, "created entry via update");
            Ok(UpdateOutcome::Created)
        }
    }

    /// Check whether `name` is present
    pub fn contains(&self, name: &str) -> VaultResult<bool> {
        Ok(self.load_all()?.contains_key(name))
    }

    /// Sorted entry names
    pub fn names(&self) -> VaultResult<Vec<String>> {
        Ok(self.load_all()?.into_keys().collect())
    }
}
