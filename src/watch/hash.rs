// src/watch/hash.rs

use std::path::Path;

use anyhow::Result;
use blake3::Hasher;

use crate::fs::FileSystem;

/// blake3 hex digest of a file's contents.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let bytes = fs.read(path)?;
    Ok(hash_bytes(&bytes))
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn hash_follows_contents() {
        let fs = MockFileSystem::new();
        fs.add_file("a.js", "let a = 1;");
        fs.add_file("b.js", "let a = 1;");
        fs.add_file("c.js", "let a = 2;");

        let a = compute_file_hash(&fs, Path::new("a.js")).unwrap();
        assert_eq!(a, compute_file_hash(&fs, Path::new("b.js")).unwrap());
        assert_ne!(a, compute_file_hash(&fs, Path::new("c.js")).unwrap());
        assert!(compute_file_hash(&fs, Path::new("missing.js")).is_err());
    }
}
