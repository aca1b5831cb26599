// src/fs/mod.rs

//! Filesystem seam for source discovery, content hashing and output writes.
//!
//! Only the handful of calls the pipeline and watcher make go through here,
//! so runtime tests can run a whole build against [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

pub trait FileSystem: Send + Sync + Debug {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write `contents`, creating missing parent directories.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Full paths of the entries in `dir`, sorted so builds visit files in a
    /// stable order.
    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// `std::fs` backed implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("reading {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(dir)
            .with_context(|| format!("listing {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("listing {}", dir.display()))?;
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_listing_is_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        fs.write(&tmp.path().join("out/b.css"), b"b").unwrap();
        fs.write(&tmp.path().join("out/a.css"), b"a").unwrap();

        let listed = fs.read_dir(&tmp.path().join("out")).unwrap();
        assert_eq!(
            listed,
            vec![tmp.path().join("out/a.css"), tmp.path().join("out/b.css")]
        );
        assert_eq!(fs.read(&listed[0]).unwrap(), b"a");
    }
}
