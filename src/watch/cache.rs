// src/watch/cache.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Last seen content hash per watched file.
///
/// Editors often emit several events for one save (truncate, write, chmod);
/// only the first one that actually changes the bytes should trigger a build.
#[derive(Debug, Default)]
pub struct FileCache {
    hashes: HashMap<PathBuf, String>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `hash` for `path`. Returns true if it differs from the last one
    /// (or the file was not seen before).
    pub fn record(&mut self, path: &Path, hash: String) -> bool {
        match self.hashes.get(path) {
            Some(old) if *old == hash => {
                debug!(?path, "contents unchanged");
                false
            }
            _ => {
                self.hashes.insert(path.to_path_buf(), hash);
                true
            }
        }
    }

    /// Forget `path` (it was removed or could not be read).
    pub fn invalidate(&mut self, path: &Path) {
        if self.hashes.remove(path).is_some() {
            debug!(?path, "invalidated cached hash");
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
