//! passvault - local, single-user password vault
//!
//! Site passwords are encrypted at rest with AES-256-GCM under a key derived
//! from a master passphrase. Access is gated by a stored verifier and
//! throttled by a lockout after repeated failures.
//!
//! # Architecture
//!
//! - `config`: Data directory resolution and settings
//! - `error`: Custom error types
//! - `crypto`: Key derivation, entry encryption, zeroizing secrets
//! - `storage`: Blob store port, salt and encrypted record stores
//! - `auth`: Master verifier, lockout guard, attempt loop
//! - `session`: Vault opener and the authenticated session handle
//! - `cli`: Subcommands, prompts and the interactive menu
//!
//! # Example
//!
//! ```rust,ignore
//! use passvault::{config::Settings, session::Vault, storage::MemoryBlobStore};
//!
//! let vault = Vault::with_store(MemoryBlobStore::new(), Settings::default());
//! let session = vault.initialize("correct horse battery")?;
//! session.add("example.com", &"s3cr3t".into())?;
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod session;
pub mod storage;

pub use error::{VaultError, VaultResult};
pub use session::{Unlock, Vault, VaultSession};
