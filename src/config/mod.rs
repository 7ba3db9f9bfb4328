//! Configuration module for passvault
//!
//! - Data directory resolution
//! - Lockout policy persisted in `config.json`

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::{LockoutPolicy, Settings, MAX_RETRY_DELAY_MS};
