use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use sitepipe::config::{ConfigFile, Layout, load_and_validate};
use sitepipe::fs::RealFileSystem;
use sitepipe::pipeline::{Banner, Pipeline};

/// A throwaway project directory on disk.
///
/// ```ignore
/// let site = SiteBuilder::new()
///     .config("[project]\ntitle = \"Home\"\nyear = 2024\n")
///     .file("src/styles/main.scss", "a { color: red }")
///     .build();
/// ```
pub struct SiteBuilder {
    config: String,
    files: Vec<(PathBuf, Vec<u8>)>,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            config: "[project]\nyear = 2024\n".to_string(),
            files: Vec::new(),
        }
    }

    /// Replace the `Sitepipe.toml` contents.
    pub fn config(mut self, toml: &str) -> Self {
        self.config = toml.to_string();
        self
    }

    pub fn file(mut self, rel: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.files.push((PathBuf::from(rel), contents.into()));
        self
    }

    pub fn build(self) -> TestSite {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(dir.path().join("Sitepipe.toml"), &self.config).expect("write config");
        for (rel, contents) in self.files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent dir");
            }
            fs::write(path, contents).expect("write fixture file");
        }
        TestSite { dir }
    }
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("Sitepipe.toml")
    }

    pub fn config(&self) -> ConfigFile {
        load_and_validate(self.config_path()).expect("valid test config")
    }

    pub fn layout(&self) -> Layout {
        self.config().layout(self.root())
    }

    /// Pipeline over the real filesystem, rooted at this site.
    pub fn pipeline(&self) -> Pipeline {
        let cfg = self.config();
        let layout = cfg.layout(self.root());
        let banner = Banner::for_project(&cfg.project);
        Pipeline::from_config(&cfg, &layout, &banner, Arc::new(RealFileSystem))
            .expect("build pipeline")
    }

    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, contents).expect("write file");
    }

    pub fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.dir.path().join(rel)).ok()
    }

    pub fn read_bytes(&self, rel: &str) -> Option<Vec<u8>> {
        fs::read(self.dir.path().join(rel)).ok()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.dir.path().join(rel).exists()
    }
}
