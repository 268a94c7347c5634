//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;

use crate::auth::DEFAULT_PROVIDER;
use crate::credentials::CONFIG_ENV;

#[derive(Parser)]
#[command(name = "mockup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Credential file location
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter (e.g. `debug`, `mockup_core=trace`); overrides RUST_LOG
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in through the browser
    Login(LoginArgs),
    /// Forget the stored token
    Logout,
    /// Show the stored server and sign-in state
    Status,
    /// Package a directory and upload it for review
    Upload(UploadArgs),
    /// Extract an uploaded archive into a version directory
    Extract(ExtractArgs),
    /// List the HTML pages of an extracted version
    Pages(PagesArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

impl Commands {
    /// Operation name used in JSON output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::Upload(_) => "upload",
            Self::Extract(_) => "extract",
            Self::Pages(_) => "pages",
            Self::Completion(_) => "completion",
        }
    }
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Server to sign in to (default: stored server, then http://localhost:8080)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Identity provider
    #[arg(long, default_value = DEFAULT_PROVIDER)]
    pub provider: String,
}

#[derive(clap::Args)]
pub struct UploadArgs {
    /// Directory holding the mockup
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Mockup name (default: directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Server to upload to (default: stored server)
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Version to extract into
    #[arg(long, value_name = "ID")]
    pub version_id: String,

    /// Storage root holding version directories
    #[arg(long, default_value = "uploads", value_name = "DIR")]
    pub storage: PathBuf,

    /// Fail on entries escaping the version directory instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Fail if the version directory already exists
    #[arg(long)]
    pub no_merge: bool,
}

#[derive(clap::Args)]
pub struct PagesArgs {
    /// Version to list
    #[arg(long, value_name = "ID")]
    pub version_id: String,

    /// Storage root holding version directories
    #[arg(long, default_value = "uploads", value_name = "DIR")]
    pub storage: PathBuf,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
