//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod login;
pub mod logout;
pub mod pages;
pub mod status;
pub mod upload;

use anyhow::Result;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::credentials::CredentialStore;
use crate::error::convert_client_error;
use crate::output::OutputFormatter;

/// Dispatches the parsed command line.
pub async fn run(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    match &cli.command {
        Commands::Login(args) => login::execute(args, cli, formatter).await,
        Commands::Logout => logout::execute(cli, formatter),
        Commands::Status => status::execute(cli, formatter),
        Commands::Upload(args) => upload::execute(args, cli, formatter).await,
        Commands::Extract(args) => extract::execute(args, formatter),
        Commands::Pages(args) => pages::execute(args, formatter),
        Commands::Completion(args) => {
            completion::execute(args.shell);
            Ok(())
        }
    }
}

fn open_store(cli: &Cli) -> Result<CredentialStore> {
    CredentialStore::locate(cli.config.as_deref()).map_err(convert_client_error)
}

const fn show_spinner(cli: &Cli) -> bool {
    !cli.quiet && !cli.json
}
