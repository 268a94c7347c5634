//! Status command implementation.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use super::open_store;
use crate::cli::Cli;
use crate::error::convert_client_error;
use crate::output::OutputFormatter;

/// Stored session as shown to the user.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub server: String,
    pub logged_in: bool,
    pub config_path: PathBuf,
}

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let store = open_store(cli)?;
    let credential = store.load().map_err(convert_client_error)?;

    let status = SessionStatus {
        server: credential.resolve_server(None),
        logged_in: credential.is_logged_in(),
        config_path: store.path().to_path_buf(),
    };
    formatter.format_status(&status)
}
