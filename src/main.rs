use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use passvault::cli::{handle_command, open_file_vault, TerminalPrompter, VaultCommands};
use passvault::config::{paths::DATA_DIR_ENV, Settings, VaultPaths};

#[derive(Parser)]
#[command(
    name = "passvault",
    version,
    about = "Local password vault protected by a master passphrase",
    long_about = "passvault keeps per-site passwords encrypted at rest. \
                  Every run asks for the master passphrase; three wrong \
                  attempts lock the vault for three minutes."
)]
struct Cli {
    /// Directory holding the vault (defaults to the platform config directory)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<VaultCommands>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PASSVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => VaultPaths::with_base_dir(dir),
        None => VaultPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    let vault = open_file_vault(&paths, settings);

    let mut prompter = TerminalPrompter;
    let mut stdout = std::io::stdout();
    handle_command(&vault, &paths, cli.command, &mut prompter, &mut stdout)?;

    Ok(())
}
