//! Master passphrase verifier
//!
//! The stored commitment is a SHA-256 hash of the *derived* key, so it is
//! bound to the vault's salt. Checking a candidate re-derives the key and
//! compares commitments in constant time; nothing is decrypted.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::crypto::{derive_key, MasterKey, Salt};
use crate::error::{VaultError, VaultResult};
use crate::storage::{SharedStore, VERIFIER_BLOB};

const DOMAIN: &[u8] = b"passvault-verifier-v1";

/// Length of the SHA-256 commitment in bytes
const COMMITMENT_LEN: usize = 32;

/// Checks candidate passphrases against the stored commitment
pub struct MasterVerifier {
    store: SharedStore,
    salt: Salt,
}

impl MasterVerifier {
    pub fn new(store: SharedStore, salt: Salt) -> Self {
        Self { store, salt }
    }

    /// Whether a commitment has been stored
    pub fn is_initialized(&self) -> VaultResult<bool> {
        self.store.exists(VERIFIER_BLOB)
    }

    /// Store the commitment for a new master passphrase.
    ///
    /// Refuses to overwrite an existing commitment. Returns the derived key
    /// so the caller can open a session without deriving twice.
    pub fn initialize(&self, passphrase: &str) -> VaultResult<MasterKey> {
        if self.is_initialized()? {
            return Err(VaultError::AlreadyInitialized);
        }

        let key = derive_key(passphrase, &self.salt);
        let line = format!("{}\n", hex::encode(commitment(&key)));
        self.store.write(VERIFIER_BLOB, line.as_bytes())?;

        info!("master passphrase verifier initialized");
        Ok(key)
    }

    /// Check a candidate passphrase. A mismatch is `Ok(false)`, not an error.
    pub fn verify(&self, passphrase: &str) -> VaultResult<bool> {
        Ok(self.verify_and_derive(passphrase)?.is_some())
    }

    /// Check a candidate passphrase and hand back its key on a match
    pub fn verify_and_derive(&self, passphrase: &str) -> VaultResult<Option<MasterKey>> {
        let stored = self.load_commitment()?;
        let key = derive_key(passphrase, &self.salt);

        let candidate = commitment(&key);
        if bool::from(candidate.as_slice().ct_eq(stored.as_slice())) {
            Ok(Some(key))
        } else {
            debug!("master passphrase rejected");
            Ok(None)
        }
    }

    fn load_commitment(&self) -> VaultResult<[u8; COMMITMENT_LEN]> {
        let bytes = self
            .store
            .read(VERIFIER_BLOB)?
            .ok_or(VaultError::NotInitialized)?;

        let text = std::str::from_utf8(&bytes)
            .map_err(|_| VaultError::Storage("Verifier file is not valid text".into()))?;
        let decoded = hex::decode(text.trim())
            .map_err(|e| VaultError::Storage(format!("Verifier file is corrupted: {}", e)))?;

        <[u8; COMMITMENT_LEN]>::try_from(decoded.as_slice()).map_err(|_| {
            VaultError::Storage(format!(
                "Verifier file is corrupted: expected {} bytes, got {}",
                COMMITMENT_LEN,
                decoded.len()
            ))
        })
    }
}

fn commitment(key: &MasterKey) -> [u8; COMMITMENT_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN);
    hasher.update(key.as_bytes());
    hasher.finalize().into()
}
