// src/pipeline/filter.rs

use std::path::{Component, Path};

/// True if `rel_path` is a partial: its file name, or any directory on the
/// way to it, starts with `_`.
///
/// `rel_path` is relative to the class source directory, so an underscore
/// somewhere above that directory (e.g. `/home/_me/site`) does not count.
pub fn is_partial(rel_path: &Path) -> bool {
    rel_path.components().any(|c| match c {
        Component::Normal(seg) => seg.to_string_lossy().starts_with('_'),
        _ => false,
    })
}
