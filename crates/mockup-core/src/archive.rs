//! In-memory mockup archives and the directory builder that produces them.

use std::path::Path;

use tracing::debug;

use crate::ArchiveError;
use crate::config::has_extension;
use crate::creation::walker::MockupWalker;
use crate::creation::zip::write_zip;

/// Content of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file with its full content.
    File(Vec<u8>),
    /// Directory marker.
    Directory,
}

/// One named entry of a mockup archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative, `/`-separated path.
    pub path: String,
    /// Entry content.
    pub kind: EntryKind,
}

/// An ordered set of relative paths and their contents, held fully in
/// memory until it is serialized for transfer.
///
/// File paths are unique: adding a file under an existing path replaces
/// the earlier content in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockupArchive {
    entries: Vec<ArchiveEntry>,
}

impl MockupArchive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file entry.
    pub fn add_file(&mut self, path: impl Into<String>, content: Vec<u8>) {
        let path = path.into();
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.path == path && matches!(entry.kind, EntryKind::File(_)))
        {
            existing.kind = EntryKind::File(content);
            return;
        }
        self.entries.push(ArchiveEntry {
            path,
            kind: EntryKind::File(content),
        });
    }

    /// Adds a directory marker.
    pub fn add_directory(&mut self, path: impl Into<String>) {
        self.entries.push(ArchiveEntry {
            path: path.into(),
            kind: EntryKind::Directory,
        });
    }

    /// Returns the entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Returns the number of entries, directory markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of file entries.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.kind, EntryKind::File(_)))
            .count()
    }

    /// Returns the sum of file content sizes.
    #[must_use]
    pub fn content_size(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| match &entry.kind {
                EntryKind::File(content) => content.len() as u64,
                EntryKind::Directory => 0,
            })
            .sum()
    }

    /// Returns `true` if some file name ends in `.extension`
    /// (case-insensitive).
    #[must_use]
    pub fn has_file_with_extension(&self, extension: &str) -> bool {
        self.entries.iter().any(|entry| {
            matches!(entry.kind, EntryKind::File(_)) && has_extension(&entry.path, extension)
        })
    }

    /// Serializes the archive into ZIP bytes for transfer.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, ArchiveError> {
        write_zip(self)
    }
}

/// Builds a [`MockupArchive`] from a directory tree.
///
/// Hidden entries (names starting with `.`) are left out, hidden
/// directories with their whole subtree. Every surviving file is read into
/// memory; the first read or walk failure aborts the build.
///
/// # Examples
///
/// ```no_run
/// use mockup_core::ArchiveBuilder;
///
/// let archive = ArchiveBuilder::new("./site").build()?;
/// println!("{} entries", archive.len());
/// # Ok::<(), mockup_core::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct ArchiveBuilder<'a> {
    root: &'a Path,
    directory_markers: bool,
}

impl<'a> ArchiveBuilder<'a> {
    /// Creates a builder for the tree rooted at `root`.
    #[must_use]
    pub fn new<P: AsRef<Path> + ?Sized>(root: &'a P) -> Self {
        Self {
            root: root.as_ref(),
            directory_markers: true,
        }
    }

    /// Controls whether subdirectories get explicit directory entries.
    #[must_use]
    pub fn directory_markers(mut self, enabled: bool) -> Self {
        self.directory_markers = enabled;
        self
    }

    /// Walks the tree and reads every visible file.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError` on the first unreadable file or failed walk
    /// step; no partial archive is returned.
    pub fn build(&self) -> Result<MockupArchive, ArchiveError> {
        let mut archive = MockupArchive::new();

        for entry in MockupWalker::new(self.root).walk() {
            let entry = entry?;
            if entry.is_dir {
                if self.directory_markers {
                    archive.add_directory(entry.archive_name);
                }
                continue;
            }

            let content = std::fs::read(&entry.path).map_err(|source| ArchiveError::Io {
                path: entry.path.clone(),
                source,
            })?;
            archive.add_file(entry.archive_name, content);
        }

        debug!(
            root = %self.root.display(),
            entries = archive.len(),
            bytes = archive.content_size(),
            "built mockup archive"
        );
        Ok(archive)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_flat_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(temp.path().join("style.css"), "body{}").unwrap();

        let archive = ArchiveBuilder::new(temp.path()).build().unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.file_count(), 2);
        assert!(archive.has_file_with_extension("html"));
        assert_eq!(
            archive.entries()[0],
            ArchiveEntry {
                path: "index.html".into(),
                kind: EntryKind::File(b"<h1>hi</h1>".to_vec()),
            }
        );
    }

    #[test]
    fn test_build_nested_with_markers() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("assets/img")).unwrap();
        fs::write(temp.path().join("assets/img/logo.svg"), "<svg/>").unwrap();
        fs::write(temp.path().join("index.html"), "x").unwrap();

        let archive = ArchiveBuilder::new(temp.path()).build().unwrap();
        let paths: Vec<_> = archive.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["assets", "assets/img", "assets/img/logo.svg", "index.html"]
        );

        let files_only = ArchiveBuilder::new(temp.path())
            .directory_markers(false)
            .build()
            .unwrap();
        assert_eq!(files_only.len(), 2);
    }

    #[test]
    fn test_build_excludes_hidden() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), "x").unwrap();
        fs::write(temp.path().join(".DS_Store"), "x").unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/config"), "x").unwrap();

        let archive = ArchiveBuilder::new(temp.path()).build().unwrap();
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_build_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = ArchiveBuilder::new(&temp.path().join("nope")).build();
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_unreadable_file_aborts() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let secret = temp.path().join("secret.html");
        fs::write(&secret, "x").unwrap();
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

        // root can read anything; only assert when permissions are enforced
        if fs::read(&secret).is_err() {
            let result = ArchiveBuilder::new(temp.path()).build();
            assert!(matches!(result, Err(ArchiveError::Io { .. })));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_build_leaves_out_symlinks() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("secret.txt"), "AWS_KEY=xyz").unwrap();
        fs::create_dir(temp.path().join("shared")).unwrap();
        fs::write(temp.path().join("shared/logo.svg"), "<svg/>").unwrap();
        let site = temp.path().join("site");
        fs::create_dir(&site).unwrap();
        fs::write(site.join("index.html"), "x").unwrap();
        std::os::unix::fs::symlink("../secret.txt", site.join("notes.txt")).unwrap();
        std::os::unix::fs::symlink("../shared", site.join("assets")).unwrap();

        let archive = ArchiveBuilder::new(&site).build().unwrap();
        assert_eq!(
            archive.entries(),
            &[ArchiveEntry {
                path: "index.html".into(),
                kind: EntryKind::File(b"x".to_vec()),
            }]
        );
    }

    #[test]
    fn test_add_file_replaces_same_path() {
        let mut archive = MockupArchive::new();
        archive.add_file("index.html", b"old".to_vec());
        archive.add_file("index.html", b"new".to_vec());
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.content_size(), 3);
        assert_eq!(archive.entries()[0].kind, EntryKind::File(b"new".to_vec()));
    }
}
