//! Login command implementation.

use std::io;

use anyhow::Result;

use super::open_store;
use super::show_spinner;
use crate::auth::BrowserOpener;
use crate::auth::LoginOptions;
use crate::auth::LoopbackAuthClient;
use crate::auth::SystemBrowser;
use crate::cli::Cli;
use crate::cli::LoginArgs;
use crate::error::convert_client_error;
use crate::output::OutputFormatter;
use crate::progress::CliSpinner;

/// Opens the system browser and tells the user where to go if that fails.
struct AnnouncingBrowser<'a> {
    formatter: &'a dyn OutputFormatter,
}

impl BrowserOpener for AnnouncingBrowser<'_> {
    fn open(&self, url: &str) -> io::Result<()> {
        SystemBrowser.open(url).inspect_err(|_| {
            self.formatter
                .format_warning(&format!("Could not open a browser. Visit {url} to sign in."));
        })
    }
}

pub async fn execute(args: &LoginArgs, cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let store = open_store(cli)?;
    let stored = store.load().map_err(convert_client_error)?;
    let options = LoginOptions::new(stored.resolve_server(args.server.as_deref()))
        .with_provider(&args.provider);

    let client = LoopbackAuthClient::with_browser(store, AnnouncingBrowser { formatter });
    let spinner = CliSpinner::start("Waiting for browser sign-in", show_spinner(cli));
    let outcome = client.login(&options).await;
    drop(spinner);

    formatter.format_login_result(&outcome.map_err(convert_client_error)?)
}
