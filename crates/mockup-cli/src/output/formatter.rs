//! Output formatter trait for CLI results.

use anyhow::Result;
use mockup_core::ExtractionReport;
use mockup_core::Version;
use serde::Serialize;

use crate::auth::LoginOutcome;
use crate::commands::status::SessionStatus;
use crate::credentials::StoredCredential;
use crate::upload::UploadSummary;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a completed sign-in
    fn format_login_result(&self, outcome: &LoginOutcome) -> Result<()>;

    /// Format the record left after logout
    fn format_logout_result(&self, credential: &StoredCredential) -> Result<()>;

    /// Format the stored session state
    fn format_status(&self, status: &SessionStatus) -> Result<()>;

    /// Format a completed upload
    fn format_upload_result(&self, summary: &UploadSummary) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, version: &Version, report: &ExtractionReport)
    -> Result<()>;

    /// Format the HTML pages of a version
    fn format_pages(&self, version_id: &str, pages: &[String]) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
