//! JSON output formatter for machine-readable results.

use std::io::Write;
use std::io::{self};

use anyhow::Result;
use mockup_core::ExtractionReport;
use mockup_core::Version;
use serde::Serialize;

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::auth::LoginOutcome;
use crate::commands::status::SessionStatus;
use crate::credentials::StoredCredential;
use crate::upload::UploadSummary;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct LoginOutput<'a> {
    server: &'a str,
    display_name: Option<&'a str>,
}

#[derive(Serialize)]
struct LogoutOutput<'a> {
    server: &'a str,
}

#[derive(Serialize)]
struct UploadOutput<'a> {
    name: &'a str,
    server: &'a str,
    project_id: &'a str,
    version_id: &'a str,
    version_num: u32,
    review_url: &'a str,
    files: usize,
    archive_size: usize,
}

#[derive(Serialize)]
struct ExtractionOutput<'a> {
    version_id: &'a str,
    root: String,
    files_extracted: usize,
    directories_created: usize,
    entries_skipped: usize,
    bytes_written: u64,
    duration_ms: u128,
    warnings: &'a [String],
}

#[derive(Serialize)]
struct PagesOutput<'a> {
    version_id: &'a str,
    pages: &'a [String],
}

impl OutputFormatter for JsonFormatter {
    fn format_login_result(&self, outcome: &LoginOutcome) -> Result<()> {
        let data = LoginOutput {
            server: &outcome.server,
            display_name: outcome.display_name.as_deref(),
        };
        Self::output(&JsonOutput::success("login", data))
    }

    fn format_logout_result(&self, credential: &StoredCredential) -> Result<()> {
        let data = LogoutOutput {
            server: &credential.server,
        };
        Self::output(&JsonOutput::success("logout", data))
    }

    fn format_status(&self, status: &SessionStatus) -> Result<()> {
        Self::output(&JsonOutput::success("status", status))
    }

    fn format_upload_result(&self, summary: &UploadSummary) -> Result<()> {
        let data = UploadOutput {
            name: &summary.name,
            server: &summary.server,
            project_id: &summary.receipt.project_id,
            version_id: &summary.receipt.version_id,
            version_num: summary.receipt.version_num,
            review_url: &summary.review_url,
            files: summary.files,
            archive_size: summary.archive_size,
        };
        Self::output(&JsonOutput::success("upload", data))
    }

    fn format_extraction_result(
        &self,
        version: &Version,
        report: &ExtractionReport,
    ) -> Result<()> {
        let data = ExtractionOutput {
            version_id: &version.id,
            root: version.root.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: &report.warnings,
        };
        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_pages(&self, version_id: &str, pages: &[String]) -> Result<()> {
        let data = PagesOutput { version_id, pages };
        Self::output(&JsonOutput::success("pages", data))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        let _ = Self::output(&output);
    }
}
