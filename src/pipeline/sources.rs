// src/pipeline/sources.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::fs::FileSystem;

/// A source file read from a class directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the class directory.
    pub rel_path: PathBuf,
    pub contents: Vec<u8>,
}

impl SourceFile {
    /// Relative path with forward slashes, as globs and template names see it.
    pub fn rel_str(&self) -> String {
        rel_to_str(&self.rel_path)
    }
}

pub(crate) fn rel_to_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Compile a class glob. `*` stays within one directory, `**` crosses them.
pub fn compile_class_glob(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// Collect every file under `class_dir` whose relative path matches
/// `matcher`, partials included, sorted by relative path.
///
/// A missing directory is an empty class, not an error.
pub fn collect_sources(
    fs: &dyn FileSystem,
    class_dir: &Path,
    matcher: &GlobMatcher,
) -> Result<Vec<SourceFile>> {
    if !fs.is_dir(class_dir) {
        debug!(dir = ?class_dir, "class directory missing; nothing to compile");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut stack = vec![class_dir.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                let Ok(rel) = path.strip_prefix(class_dir) else {
                    continue;
                };
                if matcher.is_match(rel_to_str(rel)) {
                    let contents = fs.read(&path)?;
                    files.push(SourceFile {
                        rel_path: rel.to_path_buf(),
                        path,
                        contents,
                    });
                }
            }
        }
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}
