//! Terminal input
//!
//! Commands read input through [`Prompter`] so the menu and handlers can be
//! driven by scripted answers in tests.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::crypto::SecureString;
use crate::error::{VaultError, VaultResult};

/// Minimum length for a new master passphrase
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Source of user input
pub trait Prompter {
    /// Read one visible line, without the trailing newline
    fn line(&mut self, prompt: &str) -> VaultResult<String>;

    /// Read a secret with echo suppressed
    fn secret(&mut self, prompt: &str) -> VaultResult<SecureString>;

    /// Ask a yes/no question; only "y" or "yes" count as yes
    fn confirm(&mut self, prompt: &str) -> VaultResult<bool> {
        let answer = self.line(prompt)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Reads from stdin, with secrets through `rpassword`
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn line(&mut self, prompt: &str) -> VaultResult<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(VaultError::Io("input closed".into()));
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn secret(&mut self, prompt: &str) -> VaultResult<SecureString> {
        rpassword::prompt_password(prompt)
            .map(SecureString::from)
            .map_err(|e| VaultError::Io(format!("Failed to read secret: {}", e)))
    }
}

/// Replays canned answers; secrets and lines share one queue
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self) -> VaultResult<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| VaultError::Io("input closed".into()))
    }
}

impl Prompter for ScriptedPrompter {
    fn line(&mut self, _prompt: &str) -> VaultResult<String> {
        self.next()
    }

    fn secret(&mut self, _prompt: &str) -> VaultResult<SecureString> {
        self.next().map(SecureString::from)
    }
}

/// Ask for a new master passphrase twice until both match and it is long enough
pub fn prompt_new_passphrase<P, W>(prompter: &mut P, out: &mut W) -> VaultResult<SecureString>
where
    P: Prompter + ?Sized,
    W: Write,
{
    loop {
        let first = prompter.secret("Set a master passphrase: ")?;
        if first.len() < MIN_PASSPHRASE_LEN {
            writeln!(
                out,
                "Passphrase must be at least {} characters. Please try again.",
                MIN_PASSPHRASE_LEN
            )?;
            continue;
        }

        let second = prompter.secret("Confirm passphrase: ")?;
        if first != second {
            writeln!(out, "Passphrases do not match. Please try again.")?;
            continue;
        }

        return Ok(first);
    }
}
