//! CLI command handlers
//!
//! This module bridges clap argument parsing and terminal input with the
//! vault session.

pub mod commands;
pub mod menu;
pub mod prompt;

use std::io::Write;

pub use commands::{unlock, VaultCommands};
pub use menu::{run_menu, MenuChoice};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};

use crate::config::{Settings, VaultPaths};
use crate::error::VaultResult;
use crate::session::Vault;

/// Dispatch one command. `None` opens the interactive menu.
pub fn handle_command<P, W>(
    vault: &Vault,
    paths: &VaultPaths,
    command: Option<VaultCommands>,
    prompter: &mut P,
    out: &mut W,
) -> VaultResult<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    let command = command.unwrap_or(VaultCommands::Menu);

    // Commands that need no passphrase
    match &command {
        VaultCommands::Status => return commands::show_status(vault, out),
        VaultCommands::Config => return commands::show_config(paths, vault.settings(), out),
        _ => {}
    }

    let session = unlock(vault, prompter, out)?;
    match command {
        VaultCommands::Menu => run_menu(&session, prompter, out),
        VaultCommands::Add { name } => commands::add_entry(&session, Some(&name), prompter, out),
        VaultCommands::Get { name } => commands::read_entry(&session, Some(&name), prompter, out),
        VaultCommands::Update { name, yes } => {
            commands::update_entry(&session, Some(&name), yes, prompter, out).map(|_| ())
        }
        VaultCommands::Delete { name } => {
            commands::delete_entry(&session, Some(&name), prompter, out).map(|_| ())
        }
        VaultCommands::List => commands::list_entries(&session, out),
        VaultCommands::Status | VaultCommands::Config => Ok(()),
    }
}

/// Open the file-backed vault under the resolved data directory
pub fn open_file_vault(paths: &VaultPaths, settings: Settings) -> Vault {
    Vault::with_store(crate::storage::FileBlobStore::new(paths.data_dir()), settings)
}
