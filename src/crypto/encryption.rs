//! AES-256-GCM encryption/decryption
//!
//! Provides authenticated encryption for vault entries. Each encryption
//! operation generates a unique nonce, and the result is carried as a
//! single self-describing text token: `v1.<nonce>.<ciphertext+tag>`.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::error::{VaultError, VaultResult};

use super::MasterKey;

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Current token format version
const VERSION: u8 = 1;

/// Encrypted data with the metadata needed to decrypt it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    /// Format version for future algorithm upgrades
    pub version: u8,
    /// The nonce used for this encryption
    pub nonce: [u8; NONCE_SIZE],
    /// The ciphertext with the authentication tag appended
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Render as the persisted token form
    pub fn to_token(&self) -> String {
        self.to_string()
    }

    /// Parse a persisted token
    pub fn from_token(token: &str) -> VaultResult<Self> {
        token.parse()
    }
}

impl fmt::Display for EncryptedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v{}.{}.{}",
            self.version,
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedData {
    type Err = VaultError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut parts = token.trim().split('.');
        let (Some(version), Some(nonce), Some(ciphertext), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(VaultError::Integrity("malformed ciphertext token".into()));
        };

        let version: u8 = version
            .strip_prefix('v')
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| VaultError::Integrity(format!("invalid token version '{}'", version)))?;

        let nonce_bytes = URL_SAFE_NO_PAD
            .decode(nonce)
            .map_err(|e| VaultError::Integrity(format!("invalid nonce encoding: {}", e)))?;
        let nonce = <[u8; NONCE_SIZE]>::try_from(nonce_bytes.as_slice()).map_err(|_| {
            VaultError::Integrity(format!(
                "invalid nonce size: expected {}, got {}",
                NONCE_SIZE,
                nonce_bytes.len()
            ))
        })?;

        let ciphertext = URL_SAFE_NO_PAD
            .decode(ciphertext)
            .map_err(|e| VaultError::Integrity(format!("invalid ciphertext encoding: {}", e)))?;

        Ok(Self {
            version,
            nonce,
            ciphertext,
        })
    }
}

fn cipher_for(key: &MasterKey) -> VaultResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Encrypt plaintext data using AES-256-GCM
///
/// Generates a random nonce for each encryption operation.
pub fn encrypt(plaintext: &[u8], key: &MasterKey) -> VaultResult<EncryptedData> {
    let cipher = cipher_for(key)?;

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(EncryptedData {
        version: VERSION,
        nonce,
        ciphertext,
    })
}

/// Decrypt ciphertext using AES-256-GCM
pub fn decrypt(encrypted: &EncryptedData, key: &MasterKey) -> VaultResult<Vec<u8>> {
    if encrypted.version != VERSION {
        return Err(VaultError::Integrity(format!(
            "unsupported token version: {}",
            encrypted.version
        )));
    }

    let cipher = cipher_for(key)?;
    cipher
        .decrypt(Nonce::from_slice(&encrypted.nonce), encrypted.ciphertext.as_ref())
        .map_err(|_| VaultError::Integrity("wrong key or corrupted data".to_string()))
}

/// Encrypt a string
pub fn encrypt_string(plaintext: &str, key: &MasterKey) -> VaultResult<EncryptedData> {
    encrypt(plaintext.as_bytes(), key)
}

/// Decrypt to a string
pub fn decrypt_string(encrypted: &EncryptedData, key: &MasterKey) -> VaultResult<String> {
    let plaintext = decrypt(encrypted, key)?;
    String::from_utf8(plaintext)
        .map_err(|e| VaultError::Integrity(format!("invalid UTF-8 in decrypted data: {}", e)))
}
