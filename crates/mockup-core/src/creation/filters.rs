//! Path filtering logic for mockup packaging.

use std::path::Component;
use std::path::Path;

/// Checks if a path is hidden (file name starts with '.').
///
/// Only the final component is inspected; hidden ancestors are pruned by
/// the walker before their children are visited.
///
/// # Examples
///
/// ```
/// use mockup_core::creation::filters;
/// use std::path::Path;
///
/// assert!(filters::is_hidden(Path::new(".gitignore")));
/// assert!(filters::is_hidden(Path::new("dir/.hidden")));
/// assert!(!filters::is_hidden(Path::new("visible.html")));
/// ```
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.as_encoded_bytes().first() == Some(&b'.'))
}

/// Computes the archive name of `path` relative to `root`.
///
/// Components are joined with `/` on every platform. Returns `None` when
/// `path` is not under `root` or is `root` itself.
///
/// # Examples
///
/// ```
/// use mockup_core::creation::filters::archive_name;
/// use std::path::Path;
///
/// let name = archive_name(Path::new("/site/css/main.css"), Path::new("/site"));
/// assert_eq!(name.as_deref(), Some("css/main.css"));
/// ```
#[must_use]
pub fn archive_name(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
