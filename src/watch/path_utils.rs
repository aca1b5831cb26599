// src/watch/path_utils.rs

use std::path::Path;

/// `path` relative to `root`, with forward slashes.
///
/// Falls back to comparing canonical paths, since notify may report a
/// different absolute prefix for the same directory (symlinks, `/private/var`
/// on macOS). Returns `None` for paths outside `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slashes(rel));
    }

    let root = root.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    path.strip_prefix(&root).ok().map(to_slashes)
}

fn to_slashes(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_root() {
        assert_eq!(
            relative_str(Path::new("/site/src"), Path::new("/site/src/styles/main.scss")),
            Some("styles/main.scss".to_string())
        );
    }

    #[test]
    fn outside_root_is_none() {
        assert_eq!(
            relative_str(Path::new("/site/src"), Path::new("/nonexistent/elsewhere.txt")),
            None
        );
    }
}
