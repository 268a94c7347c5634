//! Version-scoped storage of extracted mockups.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use crate::ExtractionLimits;
use crate::ExtractionReport;
use crate::Result;
use crate::SecureExtractor;
use crate::config::has_extension;

/// One uploaded version and the directory that holds its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    /// Server-assigned identifier.
    pub id: String,
    /// `storage_root/id`.
    pub root: PathBuf,
}

/// Storage root plus the limits applied to every extraction into it.
///
/// Distinct versions own disjoint directories, so extractions into
/// different versions need no coordination. Two extractions into the same
/// version are not serialized.
///
/// # Examples
///
/// ```no_run
/// use mockup_core::VersionedStorage;
///
/// let storage = VersionedStorage::new("uploads");
/// let bytes = std::fs::read("mockup.zip")?;
/// storage.extract("v1", &bytes)?;
/// for page in storage.list_html_files("v1")? {
///     println!("{}", storage.resolve_path("v1", &page).display());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct VersionedStorage {
    root: PathBuf,
    limits: ExtractionLimits,
}

impl VersionedStorage {
    /// Creates storage at `root` with default limits.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_limits(root, ExtractionLimits::default())
    }

    /// Creates storage at `root` with explicit limits.
    #[must_use]
    pub fn with_limits(root: impl Into<PathBuf>, limits: ExtractionLimits) -> Self {
        Self {
            root: root.into(),
            limits,
        }
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the extraction limits.
    #[must_use]
    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Describes `version_id` without touching the filesystem.
    #[must_use]
    pub fn version(&self, version_id: &str) -> Version {
        Version {
            id: version_id.to_string(),
            root: self.root.join(version_id),
        }
    }

    /// Extracts archive bytes into the directory of `version_id`.
    ///
    /// The directory is created on first use. Callers must not expose the
    /// version as viewable unless this returns `Ok`.
    pub fn extract(&self, version_id: &str, bytes: &[u8]) -> Result<ExtractionReport> {
        let report = SecureExtractor::new(&self.root, &self.limits).extract(version_id, bytes)?;
        info!(
            version = version_id,
            files = report.files_extracted,
            skipped = report.entries_skipped,
            bytes = report.bytes_written,
            "version extracted"
        );
        Ok(report)
    }

    /// Joins `relative` onto the version root.
    ///
    /// This is a plain join: no existence check and no traversal
    /// protection. Callers serving untrusted paths must validate them,
    /// for example with [`crate::security::contained_join`].
    #[must_use]
    pub fn resolve_path(&self, version_id: &str, relative: &str) -> PathBuf {
        self.root.join(version_id).join(relative)
    }

    /// Lists the immediate entries of the version root whose name ends in
    /// `.html` (case-insensitive), sorted by name.
    ///
    /// # Errors
    ///
    /// Fails if the version root does not exist or cannot be read.
    pub fn list_html_files(&self, version_id: &str) -> io::Result<Vec<String>> {
        let mut pages = Vec::new();
        for entry in std::fs::read_dir(self.root.join(version_id))? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if has_extension(&name, "html") {
                pages.push(name);
            }
        }
        pages.sort();
        Ok(pages)
    }
}
