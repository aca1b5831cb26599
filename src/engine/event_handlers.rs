// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, info, warn};

use crate::engine::queue::TriggerQueue;
use crate::engine::{RunSummary, RuntimeOptions, TaskName, TriggerReason};
use crate::pipeline::TaskReport;
use crate::reload::ReloadMessage;
use crate::tasks::BuildTask;
use crate::types::ReloadKind;

use super::core::CoreState;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand this task to the executor.
    RunTask(BuildTask),
    /// Tell connected browsers to refresh.
    Reload(ReloadMessage),
    /// Request that the process exits (one-shot builds, once idle).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, Default)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Mutable core state the handlers operate on.
pub(crate) struct CoreParts<'a> {
    pub state: &'a mut CoreState,
    pub queue: &'a mut TriggerQueue,
    pub pending_full_reload: &'a mut bool,
    pub summary: &'a mut RunSummary,
    pub options: &'a RuntimeOptions,
}

/// Handle a task trigger event.
///
/// - Idle: start the task right away.
/// - Busy: queue it (coalesced with an identical waiting trigger). Nothing is
///   cancelled; the running task finishes first.
pub(crate) fn handle_task_trigger(
    parts: CoreParts<'_>,
    task: TaskName,
    reason: TriggerReason,
) -> CoreStep {
    let Some(build_task) = BuildTask::named(&task) else {
        warn!(task = %task, "ignoring trigger for unknown task");
        return CoreStep {
            commands: Vec::new(),
            keep_running: true,
        };
    };

    match parts.state {
        CoreState::Idle => {
            debug!(task = %task, ?reason, "starting task");
            *parts.state = CoreState::Processing(task);
            CoreStep {
                commands: vec![CoreCommand::RunTask(build_task)],
                keep_running: true,
            }
        }
        CoreState::Processing(current) => {
            debug!(task = %task, running = %current, ?reason, "task busy; queueing trigger");
            parts.queue.record_trigger(&task);
            CoreStep {
                commands: Vec::new(),
                keep_running: true,
            }
        }
    }
}

/// Handle a finished task.
///
/// Stylesheet swaps go out immediately, one per written stylesheet.
/// Full-page reloads are held back until the queue drains, so a burst of
/// work produces a single reload.
pub(crate) fn handle_task_completion(parts: CoreParts<'_>, report: TaskReport) -> CoreStep {
    let mut commands = Vec::new();

    match &*parts.state {
        CoreState::Processing(current) if *current == report.task => {}
        other => warn!(
            task = %report.task,
            state = ?other,
            "completion for a task that was not running"
        ),
    }

    parts.summary.tasks_run += 1;
    parts.summary.failed_files += report.failed;

    if report.failed > 0 {
        warn!(
            task = %report.task,
            failed = report.failed,
            written = report.written.len(),
            "task finished with errors"
        );
    } else {
        info!(task = %report.task, written = report.written.len(), "task finished");
    }

    if !report.written.is_empty() {
        match report.reload {
            ReloadKind::StylesheetInject => {
                for out in report.written.iter() {
                    match &out.url {
                        Some(url) => commands.push(CoreCommand::Reload(ReloadMessage::Stylesheet {
                            path: url.clone(),
                        })),
                        // Not served, so the browser cannot swap it by URL.
                        None => *parts.pending_full_reload = true,
                    }
                }
            }
            ReloadKind::FullPage => *parts.pending_full_reload = true,
            ReloadKind::None => {}
        }
    }

    if let Some(next) = parts.queue.pop_next() {
        if let Some(build_task) = BuildTask::named(&next) {
            debug!(task = %next, "starting queued task");
            *parts.state = CoreState::Processing(next);
            commands.push(CoreCommand::RunTask(build_task));
            return CoreStep {
                commands,
                keep_running: true,
            };
        }
    }

    *parts.state = CoreState::Idle;

    if *parts.pending_full_reload {
        *parts.pending_full_reload = false;
        commands.push(CoreCommand::Reload(ReloadMessage::FullPage));
    }

    if parts.options.exit_when_idle {
        commands.push(CoreCommand::RequestExit);
        return CoreStep {
            commands,
            keep_running: false,
        };
    }

    CoreStep {
        commands,
        keep_running: true,
    }
}
