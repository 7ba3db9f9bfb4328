//! Cryptographic functions for passvault
//!
//! Provides AES-256-GCM entry encryption with PBKDF2-HMAC-SHA256 key
//! derivation from the master passphrase.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, decrypt_string, encrypt, encrypt_string, EncryptedData};
pub use key_derivation::{derive_key, MasterKey, Salt, KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
pub use secure_memory::SecureString;
