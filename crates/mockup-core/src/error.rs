//! Error types for mockup packaging and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Represents a specific quota resource that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// Cumulative decompressed size exceeded.
    TotalSize {
        /// Bytes observed when the ceiling was crossed.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Integer overflow detected in quota tracking.
    IntegerOverflow,
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::IntegerOverflow => {
                write!(f, "quota exceeded: integer overflow in quota tracking")
            }
        }
    }
}

/// Errors raised while building a mockup archive from a directory.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Reading a file or directory failed.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed (vanished entry, permission denied).
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Serializing the archive failed.
    #[error("cannot write archive: {0}")]
    Write(#[from] zip::result::ZipError),
}

/// Errors that can occur while extracting an uploaded archive.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The byte stream is not a readable archive.
    #[error("invalid archive: {0}")]
    Format(String),

    /// The archive contains no entries.
    #[error("archive is empty")]
    EmptyArchive,

    /// The archive holds more entries than allowed.
    #[error("archive has too many entries ({count} > {max})")]
    TooManyEntries {
        /// Number of entries in the archive.
        count: usize,
        /// Maximum allowed entry count.
        max: usize,
    },

    /// No file entry has the required extension.
    #[error("archive contains no .{extension} file")]
    ContentPolicy {
        /// Extension that was required.
        extension: String,
    },

    /// Cumulative decompressed size exceeded the ceiling.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// An entry escapes the version root and the policy rejects the archive.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// Entry name as stored in the archive.
        path: PathBuf,
    },

    /// The version identifier cannot name a directory under the storage root.
    #[error("invalid version id: {id:?}")]
    InvalidVersionId {
        /// The rejected identifier.
        id: String,
    },

    /// The version directory already exists and re-extraction is rejected.
    #[error("version {id} already exists")]
    VersionExists {
        /// Version identifier.
        id: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// Returns `true` if the upload was refused by policy rather than by
    /// a storage failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use mockup_core::ExtractionError;
    ///
    /// assert!(ExtractionError::EmptyArchive.is_policy_violation());
    ///
    /// let io = std::io::Error::other("disk full");
    /// assert!(!ExtractionError::Io(io).is_policy_violation());
    /// ```
    #[must_use]
    pub const fn is_policy_violation(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Returns `true` if this is an underlying I/O failure.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }
}
