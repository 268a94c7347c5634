//! Authenticated mockup upload.

use std::path::Path;

use mockup_core::ArchiveBuilder;
use mockup_core::ErrorBody;
use mockup_core::UploadReceipt;
use mockup_core::api::FILE_FIELD;
use mockup_core::api::NAME_FIELD;
use mockup_core::api::review_url;
use mockup_core::api::upload_url;
use mockup_core::creation::contains_extension;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use tracing::debug;
use tracing::info;

use crate::credentials::StoredCredential;
use crate::error::ClientError;

const REQUIRED_EXTENSION: &str = "html";

/// Outcome of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadSummary {
    /// Name the mockup was uploaded under.
    pub name: String,
    /// Server the archive was sent to.
    pub server: String,
    /// Allocated project and version.
    pub receipt: UploadReceipt,
    /// Browser URL of the new version.
    pub review_url: String,
    /// Number of files in the archive.
    pub files: usize,
    /// Size of the archive sent.
    pub archive_size: usize,
}

/// Uploads mockup directories with a stored credential.
pub struct UploadClient {
    http: reqwest::Client,
    credential: StoredCredential,
}

impl UploadClient {
    /// Creates a client for `credential`.
    pub fn new(credential: StoredCredential) -> Self {
        Self::with_http(credential, reqwest::Client::new())
    }

    /// Creates a client with a preconfigured HTTP client.
    pub const fn with_http(credential: StoredCredential, http: reqwest::Client) -> Self {
        Self { http, credential }
    }

    /// Packages `dir` and uploads it.
    ///
    /// `name` defaults to the directory's last path segment; `server`
    /// overrides the stored server.
    ///
    /// # Errors
    ///
    /// Local preconditions fail before any request is made:
    /// [`ClientError::Auth`] without a token, [`ClientError::Validation`] if
    /// `dir` is not a directory or holds no `.html` file. After that,
    /// [`ClientError::Transport`] means no response was received,
    /// [`ClientError::Server`] carries the server's own message and
    /// [`ClientError::InvalidResponse`] means a success carried no receipt.
    pub async fn upload(
        &self,
        dir: &Path,
        name: Option<&str>,
        server: Option<&str>,
    ) -> Result<UploadSummary, ClientError> {
        if !self.credential.is_logged_in() {
            return Err(ClientError::Auth);
        }
        if !dir.is_dir() {
            return Err(ClientError::Validation(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        if !contains_extension(dir, REQUIRED_EXTENSION)? {
            return Err(ClientError::Validation(format!(
                "no .{REQUIRED_EXTENSION} file found in {}",
                dir.display()
            )));
        }

        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| default_name(dir), str::to_string);
        let server = self.credential.resolve_server(server);

        let archive = ArchiveBuilder::new(dir).build()?;
        let files = archive.file_count();
        let bytes = archive.to_zip_bytes()?;
        let archive_size = bytes.len();
        debug!(files, archive_size, "archive ready");

        let form = Form::new()
            .text(NAME_FIELD, name.clone())
            .part(FILE_FIELD, Part::bytes(bytes).file_name("mockup.zip"));

        let response = self
            .http
            .post(upload_url(&server))
            .bearer_auth(&self.credential.token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: server_message(status.as_u16(), &body),
            });
        }

        let receipt: UploadReceipt = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let review_url = review_url(&server, &receipt);
        info!(version = %receipt.version_id, "upload complete");

        Ok(UploadSummary {
            name,
            server,
            receipt,
            review_url,
            files,
            archive_size,
        })
    }
}

fn default_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            dir.canonicalize()
                .ok()
                .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "mockup".to_string())
}

/// Picks the message to show for a failed response.
fn server_message(status: u16, body: &str) -> String {
    if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(body) {
        if !error.trim().is_empty() {
            return error;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("upload failed with status {status}")
    } else {
        trimmed.to_string()
    }
}
