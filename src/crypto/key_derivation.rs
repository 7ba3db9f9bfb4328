//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives the vault's AES-256 key from the master passphrase and the
//! per-vault salt. The work factor is fixed: changing it would make every
//! stored ciphertext unreadable.

use std::fmt;

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Random per-vault salt mixed into key derivation
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Generate a fresh salt from the OS RNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wrap raw salt bytes
    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a salt from a slice, returning `None` on a length mismatch
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; SALT_LEN]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", hex::encode(self.0))
    }
}

/// The symmetric key derived from the master passphrase.
///
/// Lives only in memory for the length of a session and is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LEN],
}

impl MasterKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    #[cfg(test)]
    pub(crate) fn from_bytes(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }
}

// Never print key material
impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// Derive the vault key from a passphrase and salt.
///
/// Deterministic: the same inputs always yield the same key.
pub fn derive_key(passphrase: &str, salt: &Salt) -> MasterKey {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key,
    );
    MasterKey { key }
}
