//! Extraction limits and policies for uploaded mockups.

/// Default ceiling on archive entries.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default cumulative decompressed-size ceiling (500 MB).
pub const DEFAULT_MAX_TOTAL_SIZE: u64 = 500 * 1024 * 1024;

/// What to do with an entry whose name resolves outside the version root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsafeEntryPolicy {
    /// Skip the entry and keep extracting the rest of the archive.
    #[default]
    Skip,
    /// Fail the whole extraction with `PathTraversal`.
    Reject,
}

/// What to do when the version directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReextractPolicy {
    /// Add and overwrite files in the existing directory.
    #[default]
    Merge,
    /// Fail with `VersionExists` before touching the directory.
    Reject,
}

/// Limits applied to every extraction.
///
/// # Examples
///
/// ```
/// use mockup_core::ExtractionLimits;
///
/// let limits = ExtractionLimits::default();
/// assert_eq!(limits.max_entries, 1000);
///
/// let small = ExtractionLimits {
///     max_total_size: 1024,
///     ..Default::default()
/// };
/// assert_eq!(small.required_extension, "html");
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionLimits {
    /// Maximum number of entries (files and directories) in an archive.
    pub max_entries: usize,

    /// Maximum cumulative decompressed bytes across all files.
    pub max_total_size: u64,

    /// Extension (without dot) at least one file must carry.
    pub required_extension: String,

    /// Handling of entries that escape the version root.
    pub unsafe_entry_policy: UnsafeEntryPolicy,

    /// Handling of uploads into an already-populated version.
    pub reextract_policy: ReextractPolicy,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
            required_extension: "html".to_string(),
            unsafe_entry_policy: UnsafeEntryPolicy::Skip,
            reextract_policy: ReextractPolicy::Merge,
        }
    }
}

impl ExtractionLimits {
    /// Returns `true` if `name` ends with the required extension,
    /// compared case-insensitively.
    #[must_use]
    pub fn has_required_extension(&self, name: &str) -> bool {
        has_extension(name, &self.required_extension)
    }
}

/// Case-insensitive `.ext` suffix check on a raw name.
#[must_use]
pub fn has_extension(name: &str, extension: &str) -> bool {
    let suffix_len = extension.len() + 1;
    if name.len() < suffix_len || !name.is_char_boundary(name.len() - suffix_len) {
        return false;
    }
    let suffix = &name[name.len() - suffix_len..];
    suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension)
}
