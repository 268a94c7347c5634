//! Client error type and conversion to user-facing errors.
//!
//! Typed failures from the client side ([`ClientError`]) and from local
//! extraction ([`ExtractionError`]) are converted into contextual `anyhow`
//! errors carrying an actionable hint.

use std::path::Path;

use anyhow::anyhow;
use mockup_core::ArchiveError;
use mockup_core::ExtractionError;
use thiserror::Error;

/// Errors raised by sign-in and upload.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No usable token is stored.
    #[error("not logged in")]
    Auth,

    /// Local input is unusable (not a directory, no HTML page).
    #[error("{0}")]
    Validation(String),

    /// The request never produced a response.
    #[error("cannot reach server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server rejected the request ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The server reported success but the body is not an upload receipt.
    #[error("server accepted the upload but sent no readable receipt: {0}")]
    InvalidResponse(String),

    /// The browser sign-in did not complete in time.
    #[error("timed out waiting for browser sign-in")]
    Timeout,

    /// The loopback listener failed.
    #[error("loopback listener failed: {0}")]
    Listener(String),

    /// The credential record cannot be read or written.
    #[error("{0}")]
    Credentials(String),

    /// Building the archive failed.
    #[error("cannot package directory: {0}")]
    Archive(#[from] ArchiveError),
}

/// Converts a client failure to a user-facing error with a hint.
pub fn convert_client_error(err: ClientError) -> anyhow::Error {
    match err {
        ClientError::Auth => anyhow!(
            "Not logged in\n\
             HINT: Run `mockup login` first."
        ),
        ClientError::Validation(reason) => anyhow!(
            "{reason}\n\
             HINT: Point `mockup upload` at a directory containing at least one .html file."
        ),
        ClientError::Transport(source) => anyhow!(
            "Cannot reach server: {source}\n\
             HINT: Check the server URL (--server) and your network connection."
        ),
        ClientError::Server { status, message } if status == 401 => anyhow!(
            "Server rejected the credentials ({status}): {message}\n\
             HINT: Your session may have expired. Run `mockup login` again."
        ),
        ClientError::InvalidResponse(reason) => anyhow!(
            "Upload accepted, but the server response could not be read: {reason}\n\
             HINT: Check that --server points at the review service."
        ),
        ClientError::Timeout => anyhow!(
            "Timed out waiting for browser sign-in\n\
             HINT: Complete the sign-in in the browser window within two minutes."
        ),
        err @ (ClientError::Server { .. }
        | ClientError::Listener(_)
        | ClientError::Credentials(_)
        | ClientError::Archive(_)) => anyhow::Error::from(err),
    }
}

/// Converts a local extraction failure to a user-facing error with a hint.
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::PathTraversal { path } => anyhow!(
            "Security violation: Archive '{}' attempted path traversal with '{}'\n\
             HINT: This archive may be malicious. Do not extract from untrusted sources.",
            archive.display(),
            path.display()
        ),
        ExtractionError::QuotaExceeded { resource } => anyhow!(
            "Extraction limit exceeded for '{}': {}\n\
             HINT: The archive expands beyond the storage budget.",
            archive.display(),
            resource
        ),
        ExtractionError::TooManyEntries { count, max } => anyhow!(
            "Archive '{}' has {count} entries (limit {max})\n\
             HINT: Split the mockup into smaller uploads.",
            archive.display()
        ),
        ExtractionError::ContentPolicy { extension } => anyhow!(
            "Archive '{}' contains no .{extension} file\n\
             HINT: A mockup needs at least one page to render.",
            archive.display()
        ),
        ExtractionError::Format(reason) => anyhow!(
            "Invalid archive '{}': {reason}\n\
             HINT: The archive may be corrupted or malformed.",
            archive.display()
        ),
        ExtractionError::VersionExists { id } => anyhow!(
            "Version '{id}' already exists under the storage root\n\
             HINT: Choose a new --version-id."
        ),
        ExtractionError::Io(io_err) => anyhow!(
            "I/O error while processing '{}': {io_err}",
            archive.display()
        ),
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}
