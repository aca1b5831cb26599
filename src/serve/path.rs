// src/serve/path.rs

//! URL to filesystem path resolution.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    /// Escapes the served root.
    Forbidden,
    NotFound,
}

/// Map a request URL onto a file under `root`.
///
/// Query strings and fragments are ignored; directories resolve to their
/// `index.html`. Any `..` segment, or a symlink leading outside `root`, is
/// forbidden.
pub fn resolve_request_path(url: &str, root: &Path) -> Resolved {
    let clean = normalize_url(url);

    if clean.split(['/', '\\']).any(|seg| seg == "..") {
        return Resolved::Forbidden;
    }

    let Ok(root) = root.canonicalize() else {
        return Resolved::NotFound;
    };
    let Ok(local) = root.join(&clean).canonicalize() else {
        return Resolved::NotFound;
    };
    if !local.starts_with(&root) {
        return Resolved::Forbidden;
    }

    if local.is_file() {
        return Resolved::File(local);
    }
    if local.is_dir() {
        let index = local.join("index.html");
        if index.is_file() {
            return Resolved::File(index);
        }
    }
    Resolved::NotFound
}

/// Decode, drop query/fragment, trim slashes.
fn normalize_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path));
    decoded.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::create_dir_all(dir.path().join("build/styles")).unwrap();
        fs::write(dir.path().join("build/styles/main.min.css"), "a{}").unwrap();
        fs::create_dir_all(dir.path().join("about")).unwrap();
        fs::write(dir.path().join("about/index.html"), "about").unwrap();
        fs::write(dir.path().join("my page.html"), "spaced").unwrap();
        dir
    }

    fn file(dir: &TempDir, rel: &str) -> Resolved {
        Resolved::File(dir.path().canonicalize().unwrap().join(rel))
    }

    #[test]
    fn root_and_directories_map_to_index() {
        let dir = site();
        assert_eq!(resolve_request_path("/", dir.path()), file(&dir, "index.html"));
        assert_eq!(
            resolve_request_path("/about/", dir.path()),
            file(&dir, "about/index.html")
        );
    }

    #[test]
    fn files_ignore_query_and_decode() {
        let dir = site();
        assert_eq!(
            resolve_request_path("/build/styles/main.min.css?sitepipe=123", dir.path()),
            file(&dir, "build/styles/main.min.css")
        );
        assert_eq!(
            resolve_request_path("/my%20page.html", dir.path()),
            file(&dir, "my page.html")
        );
    }

    #[test]
    fn traversal_is_forbidden() {
        let dir = site();
        assert_eq!(
            resolve_request_path("/../etc/passwd", dir.path()),
            Resolved::Forbidden
        );
        assert_eq!(
            resolve_request_path("/build/%2e%2e/%2e%2e/x", dir.path()),
            Resolved::Forbidden
        );
    }

    #[test]
    fn missing_is_not_found() {
        let dir = site();
        assert_eq!(resolve_request_path("/nope.html", dir.path()), Resolved::NotFound);
        assert_eq!(resolve_request_path("/build/", dir.path()), Resolved::NotFound);
    }
}
