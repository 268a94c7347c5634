//! Upload command implementation.

use anyhow::Result;

use super::open_store;
use super::show_spinner;
use crate::cli::Cli;
use crate::cli::UploadArgs;
use crate::error::convert_client_error;
use crate::output::OutputFormatter;
use crate::progress::CliSpinner;
use crate::upload::UploadClient;

pub async fn execute(args: &UploadArgs, cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let credential = open_store(cli)?
        .load()
        .map_err(convert_client_error)?;

    let spinner = CliSpinner::start(
        &format!("Uploading {}", args.dir.display()),
        show_spinner(cli),
    );
    let summary = UploadClient::new(credential)
        .upload(&args.dir, args.name.as_deref(), args.server.as_deref())
        .await;
    drop(spinner);

    formatter.format_upload_result(&summary.map_err(convert_client_error)?)
}
