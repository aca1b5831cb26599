// src/pipeline/runner.rs

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::config::{ConfigFile, Layout};
use crate::fs::FileSystem;
use crate::types::{AssetClass, ReloadKind};

use super::sources::{SourceFile, collect_sources, rel_to_str};
use super::table::{ClassPipeline, build_class_table};
use super::{Asset, Banner, TransformContext, TransformError, is_partial};

/// A file written by a class run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    /// URL path under the served root (e.g. `/build/styles/main.min.css`),
    /// when the file lives under it.
    pub url: Option<String>,
}

/// Result of running one build task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub task: String,
    pub class: AssetClass,
    pub reload: ReloadKind,
    pub written: Vec<OutputFile>,
    /// Files that failed to compile; they were logged and skipped.
    pub failed: usize,
}

impl TaskReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Owns the class table and compiles a class on demand.
#[derive(Debug)]
pub struct Pipeline {
    fs: Arc<dyn FileSystem>,
    classes: Vec<ClassPipeline>,
    root: PathBuf,
}

impl Pipeline {
    pub fn new(fs: Arc<dyn FileSystem>, classes: Vec<ClassPipeline>, root: PathBuf) -> Self {
        Self { fs, classes, root }
    }

    /// Build the class table from config and wrap it in a pipeline.
    pub fn from_config(
        cfg: &ConfigFile,
        layout: &Layout,
        banner: &Banner,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let classes = build_class_table(cfg, layout, banner)?;
        Ok(Self::new(fs, classes, layout.root.clone()))
    }

    pub fn classes(&self) -> &[ClassPipeline] {
        &self.classes
    }

    pub fn class(&self, class: AssetClass) -> Option<&ClassPipeline> {
        self.classes.iter().find(|c| c.class == class)
    }

    /// Compile every non-partial source of `class`.
    ///
    /// Never fails as a whole: unreadable directories and broken files are
    /// logged and counted in [`TaskReport::failed`].
    pub fn run_class(&self, class: AssetClass) -> TaskReport {
        let mut report = TaskReport {
            task: class.task_name().to_string(),
            class,
            reload: class.reload_kind(),
            written: Vec::new(),
            failed: 0,
        };

        let Some(entry) = self.class(class) else {
            error!(task = %class, "no pipeline registered for class");
            report.failed = 1;
            return report;
        };

        let sources = match collect_sources(self.fs.as_ref(), &entry.source_dir, &entry.matcher) {
            Ok(s) => s,
            Err(err) => {
                error!(task = %class, dir = ?entry.source_dir, "failed to read sources: {err:#}");
                report.failed = 1;
                return report;
            }
        };

        let entries: Vec<&SourceFile> = sources
            .iter()
            .filter(|s| !(class.has_partials() && is_partial(&s.rel_path)))
            .collect();
        debug!(
            task = %class,
            total = sources.len(),
            entries = entries.len(),
            "collected sources"
        );

        for source in entries {
            match self.compile_one(entry, source, &sources) {
                Ok(out) => {
                    info!(task = %class, "wrote {}", out.path.display());
                    report.written.push(out);
                }
                Err(err) => {
                    error!(task = %class, file = %source.path.display(), "{err}");
                    report.failed += 1;
                }
            }
        }

        report
    }

    fn compile_one(
        &self,
        entry: &ClassPipeline,
        source: &SourceFile,
        all: &[SourceFile],
    ) -> Result<OutputFile, TransformError> {
        let ctx = TransformContext {
            source: &source.path,
            source_rel: &source.rel_path,
            class_dir: &entry.source_dir,
            includes: all,
        };

        let mut asset = Asset::new(source.rel_path.clone(), source.contents.clone());
        for transform in entry.transforms.iter() {
            asset = transform.apply(asset, &ctx)?;
        }

        let dest = entry.dest_dir.join(&asset.rel_path);
        self.fs.write(&dest, &asset.contents)?;

        let url = url_under(&self.root, &dest);
        Ok(OutputFile { path: dest, url })
    }
}

/// `/`-rooted URL of `path` when it lives under `root`.
fn url_under(root: &Path, path: &Path) -> Option<String> {
    let root = without_cur_dir(root);
    let path = without_cur_dir(path);
    let rel = path.strip_prefix(&root).ok()?;
    Some(format!("/{}", rel_to_str(rel)))
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
