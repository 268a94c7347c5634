//! Directory tree walking with hidden-entry pruning.

use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::trace;
use walkdir::WalkDir;

use crate::ArchiveError;
use crate::config::has_extension;
use crate::creation::filters;

/// Walks a mockup directory, skipping every entry whose name starts with
/// `.` together with the whole subtree of hidden directories.
///
/// Symbolic links are skipped as well, whether they point at files or
/// directories, so nothing outside the tree is ever packaged.
///
/// The root itself is never filtered, so a mockup may live in a directory
/// such as `.build/site`.
///
/// # Examples
///
/// ```no_run
/// use mockup_core::creation::walker::MockupWalker;
/// use std::path::Path;
///
/// for entry in MockupWalker::new(Path::new("./site")).walk() {
///     let entry = entry?;
///     println!("{}", entry.archive_name);
/// }
/// # Ok::<(), mockup_core::ArchiveError>(())
/// ```
pub struct MockupWalker<'a> {
    root: &'a Path,
}

impl<'a> MockupWalker<'a> {
    /// Creates a walker rooted at `root`.
    #[must_use]
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Returns an iterator over visible entries below the root.
    ///
    /// Walk errors (unreadable directory, vanished entry) are yielded as
    /// items so the caller can abort on the first one.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkedEntry, ArchiveError>> + '_ {
        WalkDir::new(self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !filters::is_hidden(entry.path()))
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    if entry.path_is_symlink() {
                        debug!(path = %entry.path().display(), "skipping symlink");
                        return None;
                    }
                    let archive_name = filters::archive_name(entry.path(), self.root)?;
                    trace!(name = %archive_name, "visiting entry");
                    Some(Ok(WalkedEntry {
                        path: entry.path().to_path_buf(),
                        archive_name,
                        is_dir: entry.file_type().is_dir(),
                    }))
                }
                Err(e) => Some(Err(ArchiveError::Walk(e))),
            })
    }
}

/// A visible entry of the mockup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Full filesystem path.
    pub path: PathBuf,

    /// Relative, `/`-separated name used inside the archive.
    pub archive_name: String,

    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Returns `true` if the tree holds at least one visible file whose name
/// ends in `.extension`, compared case-insensitively.
///
/// # Errors
///
/// Returns the first walk error encountered before a match.
pub fn contains_extension(root: &Path, extension: &str) -> Result<bool, ArchiveError> {
    for entry in MockupWalker::new(root).walk() {
        let entry = entry?;
        if !entry.is_dir && has_extension(&entry.archive_name, extension) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(root: &Path) -> Vec<String> {
        MockupWalker::new(root)
            .walk()
            .map(|entry| entry.unwrap().archive_name)
            .collect()
    }

    #[test]
    fn test_walk_skips_hidden_files_and_subtrees() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::write(root.join(".git/objects/blob"), "x").unwrap();
        fs::create_dir(root.join("css")).unwrap();
        fs::write(root.join("css/site.css"), "body{}").unwrap();
        fs::write(root.join("css/.cache"), "x").unwrap();

        assert_eq!(names(root), vec!["css", "css/site.css", "index.html"]);
    }

    #[test]
    fn test_hidden_root_is_walked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".build");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("index.html"), "x").unwrap();

        assert_eq!(names(&root), vec!["index.html"]);
    }

    #[test]
    fn test_contains_extension() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("style.css"), "body{}").unwrap();
        assert!(!contains_extension(root, "html").unwrap());

        fs::create_dir(root.join("pages")).unwrap();
        fs::write(root.join("pages/ABOUT.HTML"), "x").unwrap();
        assert!(contains_extension(root, "html").unwrap());
    }

    #[test]
    fn test_contains_extension_ignores_hidden_and_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join(".draft.html"), "x").unwrap();
        fs::create_dir(root.join("site.html")).unwrap();
        assert!(!contains_extension(root, "html").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_file_symlink() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("secret.txt"), "AWS_KEY=xyz").unwrap();
        let root = temp.path().join("site");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("index.html"), "x").unwrap();
        std::os::unix::fs::symlink("../secret.txt", root.join("notes.txt")).unwrap();

        assert_eq!(names(&root), vec!["index.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_directory_symlink() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared");
        fs::create_dir(&shared).unwrap();
        fs::write(shared.join("logo.svg"), "<svg/>").unwrap();
        let root = temp.path().join("site");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("index.html"), "x").unwrap();
        std::os::unix::fs::symlink("../shared", root.join("assets")).unwrap();

        assert_eq!(names(&root), vec!["index.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_contains_extension_ignores_symlinked_page() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("outside.html"), "x").unwrap();
        let root = temp.path().join("site");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink("../outside.html", root.join("index.html")).unwrap();

        assert!(!contains_extension(&root, "html").unwrap());
    }

    #[test]
    fn test_walk_missing_root_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let first = MockupWalker::new(&missing).walk().next();
        assert!(matches!(first, Some(Err(ArchiveError::Walk(_)))));
    }
}
