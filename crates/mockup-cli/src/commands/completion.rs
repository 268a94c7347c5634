//! Shell completion generation command.

use std::io;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Generates shell completions for the specified shell.
pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mockup", &mut io::stdout());
}
