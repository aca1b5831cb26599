// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use globset::GlobMatcher;

use crate::engine::TaskName;
use crate::pipeline::ClassPipeline;
use crate::pipeline::sources::compile_class_glob;

/// A source glob bound to the task that rebuilds it.
///
/// The glob is relative to the watch root (the `src` directory), e.g.
/// `styles/*.scss`. Partials match as well: editing `_vars.scss` must rebuild
/// whatever imports it.
#[derive(Clone)]
pub struct WatchBinding {
    task: TaskName,
    glob: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for WatchBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchBinding")
            .field("task", &self.task)
            .field("glob", &self.glob)
            .finish_non_exhaustive()
    }
}

impl WatchBinding {
    pub fn new(task: impl Into<TaskName>, glob: impl Into<String>) -> Result<Self> {
        let glob = glob.into();
        let matcher = compile_class_glob(&glob)?;
        Ok(Self {
            task: task.into(),
            glob,
            matcher,
        })
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// `rel_path` is relative to the watch root, with forward slashes.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }
}

/// One binding per class pipeline, with globs rebased onto `watch_root`.
///
/// Classes whose source directory lies outside `watch_root` are skipped.
pub fn build_watch_bindings<'a, I>(classes: I, watch_root: &Path) -> Result<Vec<WatchBinding>>
where
    I: IntoIterator<Item = &'a ClassPipeline>,
{
    let mut bindings = Vec::new();

    for class in classes {
        let Ok(rel_dir) = class.source_dir.strip_prefix(watch_root) else {
            tracing::warn!(
                task = %class.class,
                dir = ?class.source_dir,
                "source directory is outside the watch root; not watching it"
            );
            continue;
        };

        let prefix = rel_dir.to_string_lossy().replace('\\', "/");
        let prefix = prefix.trim_matches('/');
        let glob = if prefix.is_empty() || prefix == "." {
            class.pattern.clone()
        } else {
            format!("{prefix}/{}", class.pattern)
        };

        let binding = WatchBinding::new(class.class.task_name(), glob)
            .with_context(|| format!("building watch binding for {}", class.class))?;
        bindings.push(binding);
    }

    Ok(bindings)
}

/// Names of the tasks bound to `rel_path`, in binding order, without repeats.
pub fn bound_tasks<'a>(bindings: &'a [WatchBinding], rel_path: &str) -> Vec<&'a str> {
    let mut tasks: Vec<&str> = Vec::new();
    for binding in bindings.iter().filter(|b| b.matches(rel_path)) {
        if !tasks.contains(&binding.task()) {
            tasks.push(binding.task());
        }
    }
    tasks
}
