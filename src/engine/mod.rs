// src/engine/mod.rs

//! Orchestration engine for sitepipe.
//!
//! This module ties together:
//! - the trigger queue (what happens when triggers arrive while a task runs)
//! - the main runtime event loop that reacts to:
//!   - startup and file-watch triggers
//!   - task completion reports
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::pipeline::TaskReport;

pub use crate::tasks::TaskName;

/// Why a task was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Startup (the initial compile of the requested task).
    Manual,
    /// A watched source changed.
    FileWatch,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit once idle with nothing queued (one-shot builds).
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the watcher, executor, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A build task should run.
    TaskTriggered {
        task: TaskName,
        reason: TriggerReason,
    },
    /// A build task finished.
    TaskCompleted { report: TaskReport },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Totals over a runtime session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tasks_run: usize,
    pub failed_files: usize,
}

pub mod core;
pub mod event_handlers;
pub mod queue;
pub mod runtime;

pub use core::{CoreRuntime, CoreState};
pub use event_handlers::{CoreCommand, CoreStep};
pub use queue::TriggerQueue;
pub use runtime::Runtime;
