//! Mockup CLI - sign in, package and upload HTML mockups for review.

mod auth;
mod cli;
mod commands;
mod credentials;
mod error;
mod output;
mod progress;
mod upload;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let filter = cli.log_level.as_deref().map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        |level| EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match commands::run(&cli, &*formatter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(cli.command.name(), &err);
            ExitCode::FAILURE
        }
    }
}
