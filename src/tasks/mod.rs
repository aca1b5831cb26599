// src/tasks/mod.rs

//! Build tasks and the alias graph over them.
//!
//! A [`BuildTask`] compiles exactly one asset class. Composite names such as
//! `default` are resolved by [`TaskGraph`] into an ordered list of build
//! tasks.

pub mod graph;

pub use graph::TaskGraph;

use crate::types::AssetClass;

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// A runnable unit bound to one asset class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTask {
    pub name: TaskName,
    pub class: AssetClass,
}

impl BuildTask {
    pub fn new(class: AssetClass) -> Self {
        Self {
            name: class.task_name().to_string(),
            class,
        }
    }

    /// Look up a built-in task by name.
    pub fn named(name: &str) -> Option<Self> {
        AssetClass::from_task_name(name).map(Self::new)
    }
}
