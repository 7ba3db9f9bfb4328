//! Entry commands and the unlock flow
//!
//! Shared by the one-shot subcommands and the interactive menu. Every
//! handler writes its user-facing messages to `out`.

use std::io::Write;

use clap::Subcommand;

use crate::auth::{AttemptBudget, CooldownStatus, COOLDOWN_WINDOW, MAX_ATTEMPTS};
use crate::config::{Settings, VaultPaths};
use crate::error::{VaultError, VaultResult};
use crate::session::{Unlock, Vault, VaultSession};
use crate::storage::UpdateOutcome;

use super::prompt::{prompt_new_passphrase, Prompter};

/// Vault subcommands
#[derive(Debug, Subcommand)]
pub enum VaultCommands {
    /// Open the interactive menu (default)
    Menu,

    /// Save a password for a site
    Add {
        /// Site or username
        name: String,
    },

    /// Show the password stored for a site
    #[command(alias = "read")]
    Get {
        /// Site or username
        name: String,
    },

    /// Replace the password stored for a site
    Update {
        /// Site or username
        name: String,
        /// Create the entry without asking if it does not exist
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove a site from the vault
    #[command(alias = "rm")]
    Delete {
        /// Site or username
        name: String,
    },

    /// List stored site names
    #[command(alias = "ls")]
    List,

    /// Show whether the vault is set up and whether it is locked
    Status,

    /// Show resolved paths and settings
    Config,
}

/// Set up a new vault or authenticate against an existing one
pub fn unlock<P, W>(vault: &Vault, prompter: &mut P, out: &mut W) -> VaultResult<VaultSession>
where
    P: Prompter + ?Sized,
    W: Write,
{
    if !vault.is_initialized()? {
        writeln!(out, "No vault found. Let's create one.")?;
        let passphrase = prompt_new_passphrase(prompter, out)?;
        let session = vault.initialize(&passphrase)?;
        writeln!(out, "Master passphrase saved.")?;
        return Ok(session);
    }

    let unlocked = vault.authenticate(|budget: &AttemptBudget| {
        if budget.has_failures() {
            writeln!(
                out,
                "Incorrect passphrase. {} attempt(s) left.",
                budget.remaining()
            )?;
        }
        prompter.secret("Enter master passphrase to access the vault: ")
    })?;

    match unlocked {
        Unlock::Granted(session) => {
            writeln!(out, "Access granted.")?;
            Ok(session)
        }
        Unlock::LockedOut { remaining } => Err(VaultError::LockedOut {
            remaining_secs: remaining.as_secs().max(1),
        }),
        Unlock::Denied { attempts } => {
            writeln!(
                out,
                "All attempts failed. Access denied. Try again in {:.1} minutes.",
                COOLDOWN_WINDOW.as_secs_f64() / 60.0
            )?;
            Err(VaultError::AuthenticationFailure { attempts })
        }
    }
}

fn name_or_prompt<P>(name: Option<&str>, prompter: &mut P, prompt: &str) -> VaultResult<String>
where
    P: Prompter + ?Sized,
{
    match name {
        Some(name) => Ok(name.to_string()),
        None => prompter.line(prompt),
    }
}

pub fn add_entry<P, W>(
    session: &VaultSession,
    name: Option<&str>,
    prompter: &mut P,
    out: &mut W,
) -> VaultResult<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    let name = name_or_prompt(name, prompter, "Enter the site/username: ")?;
    let secret = prompter.secret("Enter the password you want to save: ")?;
    session.add(&name, &secret)?;
    writeln!(out, "Password saved for '{}'.", name.trim())?;
    Ok(())
}

pub fn read_entry<P, W>(
    session: &VaultSession,
    name: Option<&str>,
    prompter: &mut P,
    out: &mut W,
) -> VaultResult<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    let name = name_or_prompt(name, prompter, "Enter the site/username you want the password for: ")?;
    let secret = session.read(&name)?;
    writeln!(out, "Password for '{}': {}", name.trim(), secret.as_str())?;
    Ok(())
}

pub fn update_entry<P, W>(
    session: &VaultSession,
    name: Option<&str>,
    assume_yes: bool,
    prompter: &mut P,
    out: &mut W,
) -> VaultResult<UpdateOutcome>
where
    P: Prompter + ?Sized,
    W: Write,
{
    let name = name_or_prompt(name, prompter, "Enter the site/username to update: ")?;
    let secret = prompter.secret("Enter the new password: ")?;

    let confirmed = assume_yes
        || session.contains(&name)?
        || prompter.confirm(&format!(
            "'{}' does not exist. Save as new? (y/n): ",
            name.trim()
        ))?;

    let outcome = session.update(&name, &secret, confirmed)?;
    match outcome {
        UpdateOutcome::Updated => writeln!(out, "Password updated for '{}'.", name.trim())?,
        UpdateOutcome::Created => writeln!(out, "New password added for '{}'.", name.trim())?,
        UpdateOutcome::Cancelled => writeln!(out, "Cancelled. No changes made.")?,
    }
    Ok(outcome)
}

pub fn delete_entry<P, W>(
    session: &VaultSession,
    name: Option<&str>,
    prompter: &mut P,
    out: &mut W,
) -> VaultResult<bool>
where
    P: Prompter + ?Sized,
    W: Write,
{
    let name = name_or_prompt(name, prompter, "Enter the site/username to delete: ")?;
    if !session.delete(&name)? {
        return Err(VaultError::not_found(name.trim()));
    }
    writeln!(out, "Password deleted for '{}'.", name.trim())?;
    Ok(true)
}

pub fn list_entries<W: Write>(session: &VaultSession, out: &mut W) -> VaultResult<()> {
    let names = session.list()?;
    if names.is_empty() {
        writeln!(out, "No saved passwords yet.")?;
        return Ok(());
    }
    for name in names {
        writeln!(out, "  {}", name)?;
    }
    Ok(())
}

/// Print whether the vault is initialized and locked; needs no passphrase
pub fn show_status<W: Write>(vault: &Vault, out: &mut W) -> VaultResult<()> {
    if !vault.is_initialized()? {
        writeln!(out, "Vault: not initialized")?;
        return Ok(());
    }

    writeln!(out, "Vault: initialized")?;
    match vault.lockout_status()? {
        CooldownStatus::Open => writeln!(out, "Lockout: none")?,
        CooldownStatus::CoolingDown { remaining } => writeln!(
            out,
            "Lockout: active ({:.1} minutes remaining)",
            remaining.as_secs_f64() / 60.0
        )?,
    }
    writeln!(out, "Entries: {}", vault.entry_count()?)?;
    Ok(())
}

pub fn show_config<W: Write>(paths: &VaultPaths, settings: &Settings, out: &mut W) -> VaultResult<()> {
    writeln!(out, "passvault configuration")?;
    writeln!(out, "=======================")?;
    writeln!(out, "Base directory:  {}", paths.base_dir().display())?;
    writeln!(out, "Settings file:   {}", paths.settings_file().display())?;
    writeln!(out, "Vault file:      {}", paths.vault_file().display())?;
    writeln!(out, "Salt file:       {}", paths.salt_file().display())?;
    writeln!(out, "Verifier file:   {}", paths.verifier_file().display())?;
    writeln!(out, "Cooldown marker: {}", paths.cooldown_file().display())?;
    writeln!(out)?;
    writeln!(out, "Lockout policy:")?;
    writeln!(out, "  Max attempts:  {}", MAX_ATTEMPTS)?;
    writeln!(out, "  Retry delay:   {} ms", settings.lockout.retry_delay_ms)?;
    writeln!(out, "  Cooldown:      {} s", COOLDOWN_WINDOW.as_secs())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedPrompter;
    use crate::storage::MemoryBlobStore;

    fn vault() -> Vault {
        let mut settings = Settings::default();
        settings.lockout.retry_delay_ms = 0;
        Vault::with_store(MemoryBlobStore::new(), settings)
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_first_run_then_unlock() {
        let vault = vault();
        let mut out = Vec::new();
        let mut prompter = ScriptedPrompter::new(["hunter2hunter2", "hunter2hunter2"]);
        unlock(&vault, &mut prompter, &mut out).unwrap();
        assert!(text(out).contains("Master passphrase saved."));

        let mut out = Vec::new();
        let mut prompter = ScriptedPrompter::new(["nope", "hunter2hunter2"]);
        unlock(&vault, &mut prompter, &mut out).unwrap();
        let text = text(out);
        assert!(text.contains("2 attempt(s) left"));
        assert!(text.contains("Access granted."));
    }

    #[test]
    fn test_unlock_denied_then_locked_out() {
        let vault = vault();
        vault.initialize("hunter2hunter2").unwrap();

        let mut out = Vec::new();
        let mut prompter = ScriptedPrompter::new(["a", "b", "c"]);
        let err = unlock(&vault, &mut prompter, &mut out).unwrap_err();
        assert!(matches!(err, VaultError::AuthenticationFailure { attempts: 3 }));
        assert!(text(out).contains("All attempts failed"));

        let mut prompter = ScriptedPrompter::new(["hunter2hunter2"]);
        let err = unlock(&vault, &mut prompter, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, VaultError::LockedOut { .. }));
        assert_eq!(prompter.remaining(), 1);
    }

    #[test]
    fn test_update_prompts_for_missing_entry() {
        let vault = vault();
        let session = vault.initialize("hunter2hunter2").unwrap();

        let mut prompter = ScriptedPrompter::new(["new-pass", "n"]);
        let mut out = Vec::new();
        let outcome = update_entry(&session, Some("example.com"), false, &mut prompter, &mut out).unwrap();
        assert_eq!(outcome, UpdateOutcome::Cancelled);
        assert!(text(out).contains("No changes made"));
        assert!(!session.contains("example.com").unwrap());

        let mut prompter = ScriptedPrompter::new(["new-pass", "y"]);
        let outcome =
            update_entry(&session, Some("example.com"), false, &mut prompter, &mut Vec::new()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Created);

        // Existing entries are overwritten without asking
        let mut prompter = ScriptedPrompter::new(["newer-pass"]);
        let outcome =
            update_entry(&session, Some("example.com"), false, &mut prompter, &mut Vec::new()).unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(session.read("example.com").unwrap().as_str(), "newer-pass");
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let vault = vault();
        let session = vault.initialize("hunter2hunter2").unwrap();
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let err = delete_entry(&session, Some("ghost"), &mut prompter, &mut Vec::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_output() {
        let vault = vault();
        let mut out = Vec::new();
        show_status(&vault, &mut out).unwrap();
        assert!(text(out).contains("not initialized"));

        let session = vault.initialize("hunter2hunter2").unwrap();
        session.add("a", &"1".into()).unwrap();
        let mut out = Vec::new();
        show_status(&vault, &mut out).unwrap();
        let text = text(out);
        assert!(text.contains("Lockout: none"));
        assert!(text.contains("Entries: 1"));
    }
}
