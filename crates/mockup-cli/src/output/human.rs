//! Human-readable output formatter with colors and styling.

use anyhow::Result;
use console::Term;
use console::style;
use mockup_core::ExtractionReport;
use mockup_core::Version;

use super::formatter::OutputFormatter;
use crate::auth::LoginOutcome;
use crate::commands::status::SessionStatus;
use crate::credentials::StoredCredential;
use crate::upload::UploadSummary;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn headline(&self, text: &str) {
        if self.use_colors {
            self.line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            self.line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_login_result(&self, outcome: &LoginOutcome) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&outcome.message());
        if self.verbose {
            self.line(&format!("  Server: {}", outcome.server));
        }
        Ok(())
    }

    fn format_logout_result(&self, credential: &StoredCredential) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline("Logged out");
        if !credential.server.is_empty() {
            self.line(&format!("  Server kept: {}", credential.server));
        }
        Ok(())
    }

    fn format_status(&self, status: &SessionStatus) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let state = match (status.logged_in, self.use_colors) {
            (true, true) => style("logged in").green().to_string(),
            (false, true) => style("not logged in").yellow().to_string(),
            (true, false) => "logged in".to_string(),
            (false, false) => "not logged in".to_string(),
        };
        self.line(&format!("Server: {}", status.server));
        self.line(&format!("Status: {state}"));
        if self.verbose {
            self.line(&format!("Credentials: {}", status.config_path.display()));
        }
        Ok(())
    }

    fn format_upload_result(&self, summary: &UploadSummary) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Uploaded '{}' as version {}",
            summary.name, summary.receipt.version_num
        ));
        self.line(&format!("  Project: {}", summary.receipt.project_id));
        self.line(&format!("  Version: {}", summary.receipt.version_id));
        if self.use_colors {
            self.line(&format!(
                "  Review:  {}",
                style(&summary.review_url).cyan().underlined()
            ));
        } else {
            self.line(&format!("  Review:  {}", summary.review_url));
        }

        if self.verbose {
            self.line(&format!("  Files: {}", summary.files));
            self.line(&format!(
                "  Archive size: {}",
                Self::format_size(summary.archive_size as u64)
            ));
        }
        Ok(())
    }

    fn format_extraction_result(
        &self,
        version: &Version,
        report: &ExtractionReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Extracted version {}", version.id));
        self.line(&format!("  Location: {}", version.root.display()));
        self.line(&format!("  Files extracted: {}", report.files_extracted));
        self.line(&format!("  Directories: {}", report.directories_created));
        self.line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));
        if report.entries_skipped > 0 {
            self.line(&format!("  Entries skipped: {}", report.entries_skipped));
        }

        if self.verbose {
            self.line(&format!("  Duration: {:?}", report.duration));
        }

        if report.has_warnings() {
            self.line("");
            if self.use_colors {
                self.line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                self.line("Warnings:");
            }
            for warning in &report.warnings {
                self.line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_pages(&self, version_id: &str, pages: &[String]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if pages.is_empty() {
            self.line(&format!("No pages in version {version_id}"));
        }
        for page in pages {
            self.line(page);
        }
        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("WARNING: {message}"));
        }
    }
}
