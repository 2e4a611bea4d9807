//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_web_path` - map a site-absolute path (`/data/acme.json`) below a root
//! - `page_href` - URL path of a generated page

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a web path against a directory on disk.
///
/// A leading `/` means "site root", not filesystem root. Paths that climb
/// out of `root` with `..` are rejected.
///
/// ```ignore
/// resolve_web_path(Path::new("/srv/site"), "/data/acme.json")
///     == Some("/srv/site/data/acme.json".into())
/// ```
pub fn resolve_web_path(root: &Path, web_path: &str) -> Option<PathBuf> {
    let relative = Path::new(web_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// URL path of a page under a section prefix, always with a trailing slash.
///
/// `page_href("work", "acme")` -> `"/work/acme/"`
pub fn page_href(prefix: &str, slug: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("/{slug}/")
    } else {
        format!("/{prefix}/{slug}/")
    }
}
