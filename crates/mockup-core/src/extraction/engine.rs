//! Secure extraction of an uploaded archive into a version directory.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;
use tracing::warn;
use zip::ZipArchive;

use crate::ExtractionError;
use crate::ExtractionLimits;
use crate::ExtractionReport;
use crate::Result;
use crate::config::ReextractPolicy;
use crate::config::UnsafeEntryPolicy;
use crate::copy::CopyBuffer;
use crate::copy::copy_bounded;
use crate::security::QuotaTracker;
use crate::security::contained_join;
use crate::security::is_single_component;

/// Materializes archive bytes under `storage_root/<version_id>`.
///
/// Checks run in a fixed order and the version directory is only created
/// once every archive-level check has passed:
///
/// 1. the bytes parse as a ZIP archive (`Format`)
/// 2. at least one entry (`EmptyArchive`)
/// 3. no more than `max_entries` entries (`TooManyEntries`)
/// 4. some file entry ends in the required extension (`ContentPolicy`)
/// 5. the version id is a single path component (`InvalidVersionId`)
///
/// Entries that resolve outside the version root are skipped, or fail the
/// extraction under [`UnsafeEntryPolicy::Reject`]. Decompressed bytes are
/// budgeted across the whole archive. Extraction is not transactional: on
/// failure, files already written stay on disk.
///
/// # Examples
///
/// ```no_run
/// use mockup_core::ExtractionLimits;
/// use mockup_core::SecureExtractor;
/// use std::path::Path;
///
/// let limits = ExtractionLimits::default();
/// let extractor = SecureExtractor::new(Path::new("uploads"), &limits);
/// let bytes = std::fs::read("mockup.zip")?;
/// let report = extractor.extract("v1", &bytes)?;
/// println!("{} files", report.files_extracted);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SecureExtractor<'a> {
    storage_root: &'a Path,
    limits: &'a ExtractionLimits,
}

impl<'a> SecureExtractor<'a> {
    /// Creates an extractor writing below `storage_root`.
    #[must_use]
    pub fn new(storage_root: &'a Path, limits: &'a ExtractionLimits) -> Self {
        Self {
            storage_root,
            limits,
        }
    }

    /// Extracts `bytes` into the directory of `version_id`.
    ///
    /// # Errors
    ///
    /// Returns the first policy violation, or `Io` for storage failures.
    pub fn extract(&self, version_id: &str, bytes: &[u8]) -> Result<ExtractionReport> {
        let start = Instant::now();

        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractionError::Format(e.to_string()))?;

        let count = archive.len();
        if count == 0 {
            return Err(ExtractionError::EmptyArchive);
        }
        if count > self.limits.max_entries {
            return Err(ExtractionError::TooManyEntries {
                count,
                max: self.limits.max_entries,
            });
        }
        if !self.has_required_file(&mut archive)? {
            return Err(ExtractionError::ContentPolicy {
                extension: self.limits.required_extension.clone(),
            });
        }

        let root = self.version_root(version_id)?;
        if root.exists() && self.limits.reextract_policy == ReextractPolicy::Reject {
            return Err(ExtractionError::VersionExists {
                id: version_id.to_string(),
            });
        }
        create_dir_all(&root)?;

        let mut report = ExtractionReport::new();
        let mut quota = QuotaTracker::new(self.limits.max_total_size);
        let mut buffer = CopyBuffer::new();

        for index in 0..count {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| ExtractionError::Format(e.to_string()))?;
            let name = entry.name().to_string();

            let is_dir = entry.is_dir();
            let Some(dest) = contained_join(&root, &name).filter(|dest| is_dir || *dest != root)
            else {
                if self.limits.unsafe_entry_policy == UnsafeEntryPolicy::Reject {
                    return Err(ExtractionError::PathTraversal {
                        path: PathBuf::from(name),
                    });
                }
                warn!(version = version_id, entry = %name, "skipping entry outside version root");
                report.entries_skipped += 1;
                report.add_warning(format!("skipped unsafe entry: {name}"));
                continue;
            };

            if is_dir {
                create_dir_all(&dest)?;
                report.directories_created += 1;
                continue;
            }

            if let Some(parent) = dest.parent() {
                create_dir_all(parent)?;
            }

            let mut writer = BufWriter::with_capacity(64 * 1024, File::create(&dest)?);
            let copied = copy_bounded(
                &mut entry,
                &mut writer,
                quota.next_read_limit(),
                &mut buffer,
            )?;
            writer.flush()?;
            quota.record(copied)?;

            debug!(version = version_id, entry = %name, bytes = copied, "extracted file");
            report.files_extracted += 1;
        }

        report.bytes_written = quota.bytes_written();
        report.duration = start.elapsed();
        Ok(report)
    }

    /// Returns the root directory of `version_id` after validating the id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVersionId` if the id is not a single path component.
    pub fn version_root(&self, version_id: &str) -> Result<PathBuf> {
        if !is_single_component(version_id) {
            return Err(ExtractionError::InvalidVersionId {
                id: version_id.to_string(),
            });
        }
        Ok(self.storage_root.join(version_id))
    }

    fn has_required_file(&self, archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<bool> {
        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|e| ExtractionError::Format(e.to_string()))?;
            if !entry.is_dir() && self.limits.has_required_extension(entry.name()) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
