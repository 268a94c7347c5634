//! Test utilities for building in-memory ZIP archives.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed
/// with mode 0o644.
///
/// # Examples
///
/// ```
/// use mockup_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("index.html", b"<h1>hi</h1>")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Builder for ZIP test archives with files, deflated files and directories.
///
/// Entry names are written verbatim, so hostile names such as
/// `../escape.html` or `/etc/passwd` can be produced.
///
/// # Examples
///
/// ```
/// use mockup_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_directory("css/")
///     .add_file("css/site.css", b"body{}")
///     .add_file("index.html", b"<h1>hi</h1>")
///     .build();
/// ```
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored (uncompressed) file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        self.writer.start_file(path, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a deflated file, useful for high-ratio payloads.
    #[must_use]
    pub fn add_deflated_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(data.len() as u64 >= u64::from(u32::MAX))
            .unix_permissions(0o644);
        self.writer.start_file(path, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry; a trailing `/` is appended when missing.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        let name = if path.ends_with('/') {
            path.to_string()
        } else {
            format!("{path}/")
        };
        self.writer.add_directory(name, options).unwrap();
        self
    }

    /// Finishes the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
