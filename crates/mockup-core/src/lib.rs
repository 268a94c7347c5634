//! Mockup packaging and secure version-scoped extraction.
//!
//! `mockup-core` turns a directory of HTML mockups into an in-memory archive
//! for upload, and on the receiving side extracts uploaded archives into
//! per-version directories with protection against path traversal,
//! oversized archives and decompression bombs.
//!
//! # Examples
//!
//! ```no_run
//! use mockup_core::ArchiveBuilder;
//! use mockup_core::VersionedStorage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = ArchiveBuilder::new("./site").build()?;
//! let bytes = archive.to_zip_bytes()?;
//!
//! let storage = VersionedStorage::new("uploads");
//! let report = storage.extract("v1", &bytes)?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod copy;
pub mod creation;
pub mod error;
pub mod extraction;
pub mod ingest;
pub mod report;
pub mod security;
pub mod storage;

#[doc(hidden)]
pub mod test_utils;

pub use api::ErrorBody;
pub use api::UploadReceipt;
pub use archive::ArchiveBuilder;
pub use archive::ArchiveEntry;
pub use archive::EntryKind;
pub use archive::MockupArchive;
pub use config::ExtractionLimits;
pub use error::ArchiveError;
pub use error::ExtractionError;
pub use error::QuotaResource;
pub use error::Result;
pub use extraction::SecureExtractor;
pub use ingest::IngestError;
pub use ingest::IngestGate;
pub use report::ExtractionReport;
pub use storage::Version;
pub use storage::VersionedStorage;
