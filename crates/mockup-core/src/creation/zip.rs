//! ZIP serialization of an in-memory mockup archive.

use std::io::Cursor;
use std::io::Write;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ArchiveError;
use crate::archive::EntryKind;
use crate::archive::MockupArchive;

/// Default deflate level for uploaded archives.
const COMPRESSION_LEVEL: i64 = 6;

/// Serializes `archive` into ZIP bytes.
///
/// Directory markers are written as `name/` entries; file entries are
/// deflated. Entry order matches the archive's insertion order.
///
/// # Errors
///
/// Returns `ArchiveError::Write` if the ZIP writer fails.
pub fn write_zip(archive: &MockupArchive) -> Result<Vec<u8>, ArchiveError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .unix_permissions(0o644);

    for entry in archive.entries() {
        match &entry.kind {
            EntryKind::Directory => {
                zip.add_directory(format!("{}/", entry.path), options.unix_permissions(0o755))?;
            }
            EntryKind::File(content) => {
                zip.start_file(entry.path.as_str(), options)?;
                zip.write_all(content)
                    .map_err(|e| ArchiveError::Write(e.into()))?;
            }
        }
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_write_zip_entries_and_content() {
        let mut archive = MockupArchive::new();
        archive.add_directory("css");
        archive.add_file("css/site.css", b"body{}".to_vec());
        archive.add_file("index.html", b"<h1>hi</h1>".to_vec());

        let bytes = write_zip(&archive).unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 3);

        let dir = zip.by_index(0).unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir.name(), "css/");
        drop(dir);

        let mut index = zip.by_name("index.html").unwrap();
        let mut content = String::new();
        index.read_to_string(&mut content).unwrap();
        assert_eq!(content, "<h1>hi</h1>");
    }

    #[test]
    fn test_write_zip_empty_archive() {
        let bytes = write_zip(&MockupArchive::new()).unwrap();
        let zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 0);
    }
}
