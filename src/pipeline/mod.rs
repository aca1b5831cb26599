// src/pipeline/mod.rs

//! The asset pipeline.
//!
//! Each asset class (style, script, template, image) is described by a
//! [`ClassPipeline`]: where its sources live, which of them to pick up, the
//! ordered [`Transform`] chain, and where results are written. The
//! [`Pipeline`] runner owns the table and compiles one class at a time.
//!
//! Per-file failures never escape the runner: they are logged, counted in
//! the [`TaskReport`], and the rest of the class carries on.
//!
//! - [`filter`]: the partial-file rule.
//! - [`sources`]: walking a class directory.
//! - [`banner`]: the metadata header prepended to styles and scripts.
//! - [`style`], [`script`], [`template`], [`common`]: transforms.
//! - [`table`]: building the class table from config.
//! - [`runner`]: running a class and reporting what was written.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod banner;
pub mod common;
pub mod filter;
pub mod runner;
pub mod script;
pub mod sources;
pub mod style;
pub mod table;
pub mod template;

pub use banner::Banner;
pub use filter::is_partial;
pub use runner::{OutputFile, Pipeline, TaskReport};
pub use sources::{SourceFile, collect_sources};
pub use table::{ClassPipeline, build_class_table};

/// A file moving through a transform chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Output path relative to the class destination directory.
    pub rel_path: PathBuf,
    pub contents: Vec<u8>,
}

impl Asset {
    pub fn new(rel_path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            rel_path: rel_path.into(),
            contents: contents.into(),
        }
    }

    /// Contents as UTF-8, or a [`TransformError::Encoding`] naming `source`.
    pub fn text(&self, source: &Path) -> Result<&str, TransformError> {
        std::str::from_utf8(&self.contents).map_err(|_| TransformError::Encoding {
            path: source.to_path_buf(),
        })
    }
}

/// What a transform can see besides the asset itself.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// The source file being compiled (absolute or base-relative).
    pub source: &'a Path,
    /// The source path relative to the class directory.
    pub source_rel: &'a Path,
    /// Class source directory.
    pub class_dir: &'a Path,
    /// Every source of the class, partials included.
    pub includes: &'a [SourceFile],
}

/// One step of a class's chain.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, asset: Asset, ctx: &TransformContext<'_>) -> Result<Asset, TransformError>;
}

/// Why a single file failed to compile.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{}: {message}", path.display())]
    Compile { path: PathBuf, message: String },

    #[error("{}: syntax error: {message}", path.display())]
    Syntax { path: PathBuf, message: String },

    #[error("{}: template error: {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("`{program}` failed: {message}")]
    Command { program: String, message: String },

    #[error("{}: not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error(transparent)]
    Io(#[from] anyhow::Error),
}
