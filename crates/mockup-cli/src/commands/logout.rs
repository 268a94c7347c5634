//! Logout command implementation.

use anyhow::Result;

use super::open_store;
use crate::cli::Cli;
use crate::error::convert_client_error;
use crate::output::OutputFormatter;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let credential = open_store(cli)?
        .logout()
        .map_err(convert_client_error)?;
    formatter.format_logout_result(&credential)
}
