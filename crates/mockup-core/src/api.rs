//! HTTP contract shared by the upload client and the ingest side.

use serde::Deserialize;
use serde::Serialize;

/// Path of the upload endpoint, relative to the server base URL.
pub const UPLOAD_PATH: &str = "/api/upload";

/// Multipart field carrying the archive bytes.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the human-assigned mockup name.
pub const NAME_FIELD: &str = "name";

/// Query parameter carrying the session token on the loopback callback.
pub const TOKEN_PARAM: &str = "token";

/// Query parameter carrying the optional display name on the callback.
pub const DISPLAY_NAME_PARAM: &str = "name";

/// Successful upload response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Project the version belongs to.
    pub project_id: String,
    /// Newly allocated version.
    pub version_id: String,
    /// Human-facing version number within the project.
    pub version_num: u32,
}

/// Structured failure body, `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Builds the browser entry point of the sign-in handshake.
///
/// # Examples
///
/// ```
/// use mockup_core::api::cli_login_url;
///
/// assert_eq!(
///     cli_login_url("https://review.example.com/", "github", 49152),
///     "https://review.example.com/auth/github/cli-login?port=49152"
/// );
/// ```
#[must_use]
pub fn cli_login_url(server: &str, provider: &str, port: u16) -> String {
    format!(
        "{}/auth/{provider}/cli-login?port={port}",
        server.trim_end_matches('/')
    )
}

/// Builds the upload endpoint URL for `server`.
#[must_use]
pub fn upload_url(server: &str) -> String {
    format!("{}{UPLOAD_PATH}", server.trim_end_matches('/'))
}

/// Builds the browser URL for reviewing an uploaded version.
#[must_use]
pub fn review_url(server: &str, receipt: &UploadReceipt) -> String {
    format!(
        "{}/projects/{}/versions/{}",
        server.trim_end_matches('/'),
        receipt.project_id,
        receipt.version_id
    )
}
