//! Interactive menu
//!
//! Runs operations against an unlocked session until the user exits.
//! Recoverable errors (missing entry, failed decryption, bad input) are
//! reported and the menu continues; storage failures end the loop.

use std::io::Write;
use std::str::FromStr;

use tracing::error;

use crate::error::{VaultError, VaultResult};
use crate::session::VaultSession;

use super::commands::{add_entry, delete_entry, list_entries, read_entry, update_entry};
use super::prompt::Prompter;

const MENU: &str = "\nChoose an action to perform:\n\
                    1. Add password\n\
                    2. Read password\n\
                    3. Update password\n\
                    4. Delete password\n\
                    5. List sites\n\
                    6. Exit\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Read,
    Update,
    Delete,
    List,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "add" => Ok(Self::Add),
            "2" | "read" | "get" => Ok(Self::Read),
            "3" | "update" => Ok(Self::Update),
            "4" | "delete" => Ok(Self::Delete),
            "5" | "list" => Ok(Self::List),
            "6" | "exit" | "quit" | "q" => Ok(Self::Exit),
            other => Err(VaultError::Validation(format!(
                "Invalid option '{}'. Please choose a number between 1 and 6.",
                other
            ))),
        }
    }
}

/// Loop over the menu until the user picks exit
pub fn run_menu<P, W>(session: &VaultSession, prompter: &mut P, out: &mut W) -> VaultResult<()>
where
    P: Prompter + ?Sized,
    W: Write,
{
    loop {
        write!(out, "{}", MENU)?;
        out.flush()?;

        let choice = match prompter.line("> ")?.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        let result = match choice {
            MenuChoice::Add => add_entry(session, None, prompter, out),
            MenuChoice::Read => read_entry(session, None, prompter, out),
            MenuChoice::Update => update_entry(session, None, false, prompter, out).map(|_| ()),
            MenuChoice::Delete => delete_entry(session, None, prompter, out).map(|_| ()),
            MenuChoice::List => list_entries(session, out),
            MenuChoice::Exit => return Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(e) if e.is_fatal() => {
                error!(error = %e, "menu operation failed");
                return Err(e);
            }
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedPrompter;
    use crate::config::Settings;
    use crate::session::Vault;
    use crate::storage::MemoryBlobStore;

    fn session() -> VaultSession {
        Vault::with_store(MemoryBlobStore::new(), Settings::default())
            .initialize("menu-master-pass")
            .unwrap()
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!("1".parse::<MenuChoice>().unwrap(), MenuChoice::Add);
        assert_eq!(" 6 ".parse::<MenuChoice>().unwrap(), MenuChoice::Exit);
        assert_eq!("Delete".parse::<MenuChoice>().unwrap(), MenuChoice::Delete);
        assert!("7".parse::<MenuChoice>().is_err());
    }

    #[test]
    fn test_menu_session_scenario() {
        let session = session();
        let mut prompter = ScriptedPrompter::new([
            "1", "example.com", "s3cr3t", // add
            "2", "example.com", // read
            "9", // invalid choice
            "4", "example.com", // delete
            "2", "example.com", // read again: not found
            "6",
        ]);
        let mut out = Vec::new();

        run_menu(&session, &mut prompter, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Password saved for 'example.com'."));
        assert!(text.contains("Password for 'example.com': s3cr3t"));
        assert!(text.contains("Invalid option '9'"));
        assert!(text.contains("Password deleted for 'example.com'."));
        assert!(text.contains("Entry not found: example.com"));
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_menu_ends_when_input_closes() {
        let session = session();
        let mut prompter = ScriptedPrompter::new(["5"]);
        let mut out = Vec::new();

        let err = run_menu(&session, &mut prompter, &mut out).unwrap_err();
        assert!(matches!(err, VaultError::Io(_)));
        assert!(String::from_utf8(out).unwrap().contains("No saved passwords yet."));
    }
}
