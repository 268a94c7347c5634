//! Extraction operation reporting.

use std::time::Duration;

/// Report of a completed extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Number of entries skipped because they escape the version root.
    pub entries_skipped: usize,

    /// Total decompressed bytes written.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,

    /// Warnings generated during extraction.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns total number of entries materialized.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let mut report = ExtractionReport::new();
        report.files_extracted = 3;
        report.directories_created = 2;
        assert_eq!(report.total_items(), 5);
        assert!(!report.has_warnings());

        report.add_warning("skipped ../x".to_string());
        assert!(report.has_warnings());
    }
}
