//! Vault opener and authenticated session
//!
//! [`Vault`] wires the salt, verifier and lockout components to one blob
//! store. A [`VaultSession`] can only be obtained through a successful
//! [`Vault::initialize`] or [`Vault::authenticate`]; holding one is the
//! proof of authentication, and its operations never re-prompt.

use std::sync::Arc;

use crate::auth::{
    authenticate, AttemptBudget, AuthOutcome, CooldownStatus, LockoutGuard, MasterVerifier,
    COOLDOWN_WINDOW,
};
use crate::config::Settings;
use crate::crypto::{MasterKey, Salt, SecureString};
use crate::error::{VaultError, VaultResult};
use crate::storage::{
    BlobStore, EncryptedRecordStore, SaltStore, SharedStore, UpdateOutcome, VERIFIER_BLOB,
};

/// Result of [`Vault::authenticate`]
#[derive(Debug)]
pub enum Unlock {
    Granted(VaultSession),
    LockedOut { remaining: std::time::Duration },
    Denied { attempts: u32 },
}

/// Entry point for opening a vault
pub struct Vault {
    store: SharedStore,
    settings: Settings,
}

impl Vault {
    pub fn open(store: SharedStore, settings: Settings) -> Self {
        Self { store, settings }
    }

    /// Convenience constructor for a concrete store
    pub fn with_store(store: impl BlobStore + 'static, settings: Settings) -> Self {
        Self::open(Arc::new(store), settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether a master passphrase has been set. Decided by the verifier alone.
    pub fn is_initialized(&self) -> VaultResult<bool> {
        self.store.exists(VERIFIER_BLOB)
    }

    /// First-run setup: create the salt and verifier, then open a session
    pub fn initialize(&self, passphrase: &str) -> VaultResult<VaultSession> {
        if self.is_initialized()? {
            // Never mint a salt under an existing verifier
            self.existing_salt()?;
            return Err(VaultError::AlreadyInitialized);
        }
        if passphrase.is_empty() {
            return Err(VaultError::Validation(
                "Master passphrase must not be empty".into(),
            ));
        }
        let salt = SaltStore::new(self.store.clone()).get_or_create()?;
        let key = MasterVerifier::new(self.store.clone(), salt).initialize(passphrase)?;
        Ok(self.session(key))
    }

    /// Run the bounded attempt loop against the stored verifier
    pub fn authenticate<F>(&self, prompt: F) -> VaultResult<Unlock>
    where
        F: FnMut(&AttemptBudget) -> VaultResult<SecureString>,
    {
        if !self.is_initialized()? {
            return Err(VaultError::NotInitialized);
        }
        let verifier = MasterVerifier::new(self.store.clone(), self.existing_salt()?);

        let budget = AttemptBudget::from_policy(&self.settings.lockout);
        let outcome = match authenticate(&verifier, &self.guard(), budget, prompt)? {
            AuthOutcome::Granted(key) => Unlock::Granted(self.session(key)),
            AuthOutcome::LockedOut { remaining } => Unlock::LockedOut { remaining },
            AuthOutcome::Denied { attempts } => Unlock::Denied { attempts },
        };
        Ok(outcome)
    }

    /// Current lockout status. Clears an expired lockout.
    pub fn lockout_status(&self) -> VaultResult<CooldownStatus> {
        self.guard().check_cooldown()
    }

    /// Number of stored entries; needs no key
    pub fn entry_count(&self) -> VaultResult<usize> {
        Ok(EncryptedRecordStore::new(self.store.clone()).load_all()?.len())
    }

    /// Salt of an initialized vault; its absence means the vault is damaged
    fn existing_salt(&self) -> VaultResult<Salt> {
        SaltStore::new(self.store.clone())
            .load()?
            .ok_or_else(|| VaultError::Storage("salt file missing".into()))
    }

    fn guard(&self) -> LockoutGuard {
        LockoutGuard::new(self.store.clone(), COOLDOWN_WINDOW)
    }

    fn session(&self, key: MasterKey) -> VaultSession {
        VaultSession {
            key,
            records: EncryptedRecordStore::new(self.store.clone()),
        }
    }
}

/// An authenticated handle bound to the derived key
pub struct VaultSession {
    key: MasterKey,
    records: EncryptedRecordStore,
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession").finish_non_exhaustive()
    }
}

impl VaultSession {
    /// Store a secret, replacing any existing entry of the same name.
    ///
    /// Names are trimmed, so `" a"` and `"a"` refer to one entry.
    pub fn add(&self, name: &str, secret: &SecureString) -> VaultResult<()> {
        self.records.put(normalize_name(name)?, secret, &self.key)
    }

    /// Decrypt the secret stored under `name`.
    ///
    /// `name` is trimmed first; a stored key with surrounding whitespace
    /// cannot be reached.
    pub fn read(&self, name: &str) -> VaultResult<SecureString> {
        self.records.get(normalize_name(name)?, &self.key)
    }

    /// Replace a secret; an absent entry is only created when confirmed
    pub fn update(
        &self,
        name: &str,
        secret: &SecureString,
        confirm_create_if_absent: bool,
    ) -> VaultResult<UpdateOutcome> {
        self.records.update(
            normalize_name(name)?,
            secret,
            &self.key,
            confirm_create_if_absent,
        )
    }

    /// Remove an entry, returning whether it existed
    pub fn delete(&self, name: &str) -> VaultResult<bool> {
        self.records.delete(normalize_name(name)?)
    }

    pub fn contains(&self, name: &str) -> VaultResult<bool> {
        self.records.contains(normalize_name(name)?)
    }

    /// Sorted entry names
    pub fn list(&self) -> VaultResult<Vec<String>> {
        self.records.names()
    }
}

fn normalize_name(name: &str) -> VaultResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VaultError::Validation("Entry name must not be empty".into()));
    }
    Ok(name)
}
