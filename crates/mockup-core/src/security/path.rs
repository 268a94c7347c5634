//! Lexical path containment.
//!
//! Containment is decided purely on path text: no component is resolved
//! against the filesystem, so the check is identical before and after the
//! destination exists.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Normalizes a path without touching the filesystem.
///
/// `.` components are dropped and `..` removes the preceding normal
/// component. A `..` directly under a root stays at the root, and leading
/// `..` components of a relative path are kept.
///
/// # Examples
///
/// ```
/// use mockup_core::security::clean_path;
/// use std::path::Path;
///
/// assert_eq!(clean_path(Path::new("/srv/v1/a/../b")), Path::new("/srv/v1/b"));
/// assert_eq!(clean_path(Path::new("/srv/v1/../../..")), Path::new("/"));
/// assert_eq!(clean_path(Path::new("a/./b/")), Path::new("a/b"));
/// ```
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut stack: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match stack.last() {
                Some(Component::Normal(_)) => {
                    stack.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => stack.push(component),
            },
            other => stack.push(other),
        }
    }

    if stack.is_empty() {
        return PathBuf::from(".");
    }
    stack.iter().collect()
}

/// Joins `name` onto `root` and returns the cleaned destination if it stays
/// lexically inside `root`.
///
/// The destination is accepted when it equals the cleaned root or lies
/// beneath it component-wise, which is the same as a literal
/// `root + separator` prefix on cleaned paths. Absolute names replace the
/// root on join and are therefore rejected.
///
/// # Examples
///
/// ```
/// use mockup_core::security::contained_join;
/// use std::path::Path;
///
/// let root = Path::new("/srv/uploads/v1");
/// assert!(contained_join(root, "css/site.css").is_some());
/// assert!(contained_join(root, "../v2/index.html").is_none());
/// assert!(contained_join(root, "/etc/passwd").is_none());
/// ```
#[must_use]
pub fn contained_join(root: &Path, name: &str) -> Option<PathBuf> {
    let root = clean_path(root);
    let candidate = clean_path(&root.join(name));
    if candidate == root || candidate.starts_with(&root) {
        Some(candidate)
    } else {
        None
    }
}

/// Returns `true` if `id` is usable as a single directory name.
#[must_use]
pub fn is_single_component(id: &str) -> bool {
    if id.is_empty() || id.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
