// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! The core consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of commands describing what the IO shell should do next
//!
//! It has no channels, no Tokio types, and performs no IO, so its behaviour
//! is unit tested directly.

use tracing::info;

use crate::engine::event_handlers::{
    CoreParts, CoreStep, handle_task_completion, handle_task_trigger,
};
use crate::engine::queue::TriggerQueue;
use crate::engine::{RunSummary, RuntimeEvent, RuntimeOptions, TaskName};

/// "idle, watching" or "processing one task".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CoreState {
    #[default]
    Idle,
    Processing(TaskName),
}

#[derive(Debug)]
pub struct CoreRuntime {
    state: CoreState,
    queue: TriggerQueue,
    pending_full_reload: bool,
    summary: RunSummary,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            state: CoreState::Idle,
            queue: TriggerQueue::new(),
            pending_full_reload: false,
            summary: RunSummary::default(),
            options,
        }
    }

    pub fn state(&self) -> &CoreState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CoreState::Idle
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::TaskTriggered { task, reason } => {
                handle_task_trigger(self.parts(), task, reason)
            }
            RuntimeEvent::TaskCompleted { report } => handle_task_completion(self.parts(), report),
            RuntimeEvent::ShutdownRequested => {
                let dropped = self.queue.drain_pending();
                if !dropped.is_empty() {
                    info!(?dropped, "shutting down; queued tasks will not run");
                }
                CoreStep {
                    commands: Vec::new(),
                    keep_running: false,
                }
            }
        }
    }

    fn parts(&mut self) -> CoreParts<'_> {
        CoreParts {
            state: &mut self.state,
            queue: &mut self.queue,
            pending_full_reload: &mut self.pending_full_reload,
            summary: &mut self.summary,
            options: &self.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::engine::{CoreCommand, TriggerReason};
    use crate::pipeline::{OutputFile, TaskReport};
    use crate::reload::ReloadMessage;
    use crate::tasks::BuildTask;
    use crate::types::AssetClass;

    fn trigger(task: &str) -> RuntimeEvent {
        RuntimeEvent::TaskTriggered {
            task: task.to_string(),
            reason: TriggerReason::FileWatch,
        }
    }

    fn done(class: AssetClass, written: &[&str], failed: usize) -> RuntimeEvent {
        RuntimeEvent::TaskCompleted {
            report: TaskReport {
                task: class.task_name().to_string(),
                class,
                reload: class.reload_kind(),
                written: written
                    .iter()
                    .map(|u| OutputFile {
                        path: PathBuf::from(format!(".{u}")),
                        url: Some(u.to_string()),
                    })
                    .collect(),
                failed,
            },
        }
    }

    fn run(class: AssetClass) -> CoreCommand {
        CoreCommand::RunTask(BuildTask::new(class))
    }

    #[test]
    fn trigger_while_idle_runs_immediately() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        let step = core.step(trigger("styles"));
        assert_eq!(step.commands, vec![run(AssetClass::Style)]);
        assert_eq!(core.state(), &CoreState::Processing("styles".into()));
    }

    #[test]
    fn triggers_while_busy_queue_and_coalesce() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        core.step(trigger("scripts"));
        assert!(core.step(trigger("scripts")).commands.is_empty());
        assert!(core.step(trigger("scripts")).commands.is_empty());
        assert!(core.step(trigger("templates")).commands.is_empty());

        let step = core.step(done(AssetClass::Script, &["/build/scripts/a.min.js"], 0));
        assert_eq!(step.commands, vec![run(AssetClass::Script)]);

        let step = core.step(done(AssetClass::Script, &["/build/scripts/a.min.js"], 0));
        assert_eq!(step.commands, vec![run(AssetClass::Template)]);

        // One full reload for the whole burst.
        let step = core.step(done(AssetClass::Template, &["/index.html"], 0));
        assert_eq!(step.commands, vec![CoreCommand::Reload(ReloadMessage::FullPage)]);
        assert!(core.is_idle());
        assert!(step.keep_running);
    }

    #[test]
    fn stylesheets_swap_per_file() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        core.step(trigger("styles"));
        let step = core.step(done(
            AssetClass::Style,
            &["/build/styles/a.min.css", "/build/styles/b.min.css"],
            0,
        ));
        assert_eq!(
            step.commands,
            vec![
                CoreCommand::Reload(ReloadMessage::Stylesheet {
                    path: "/build/styles/a.min.css".into()
                }),
                CoreCommand::Reload(ReloadMessage::Stylesheet {
                    path: "/build/styles/b.min.css".into()
                }),
            ]
        );
    }

    #[test]
    fn nothing_written_means_no_reload() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        core.step(trigger("scripts"));
        let step = core.step(done(AssetClass::Script, &[], 1));
        assert!(step.commands.is_empty());
        assert_eq!(core.summary().failed_files, 1);
    }

    #[test]
    fn images_do_not_reload() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        core.step(trigger("images"));
        let step = core.step(done(AssetClass::Image, &["/build/images/me.jpg"], 0));
        assert!(step.commands.is_empty());
    }

    #[test]
    fn exits_when_idle_in_one_shot_mode() {
        let mut core = CoreRuntime::new(RuntimeOptions {
            exit_when_idle: true,
        });
        core.step(trigger("styles"));
        core.step(trigger("images"));

        let step = core.step(done(AssetClass::Style, &[], 0));
        assert!(step.keep_running);

        let step = core.step(done(AssetClass::Image, &[], 0));
        assert!(!step.keep_running);
        assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
        assert_eq!(core.summary().tasks_run, 2);
    }

    #[test]
    fn unknown_task_is_ignored() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        let step = core.step(trigger("deploy"));
        assert!(step.commands.is_empty());
        assert!(step.keep_running);
        assert!(core.is_idle());
    }

    #[test]
    fn stray_completion_still_settles_idle() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        let step = core.step(done(AssetClass::Template, &["/index.html"], 0));
        assert_eq!(step.commands, vec![CoreCommand::Reload(ReloadMessage::FullPage)]);
        assert!(core.is_idle());

        core.step(trigger("styles"));
        let step = core.step(done(AssetClass::Script, &[], 0));
        assert!(step.commands.is_empty());
        assert!(core.is_idle());
    }

    #[test]
    fn shutdown_stops_the_loop() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        assert!(!core.step(RuntimeEvent::ShutdownRequested).keep_running);
    }

    #[test]
    fn shutdown_drops_queued_work() {
        let mut core = CoreRuntime::new(RuntimeOptions::default());
        core.step(trigger("styles"));
        core.step(trigger("scripts"));
        core.step(trigger("templates"));
        assert!(!core.queue.is_empty());

        let step = core.step(RuntimeEvent::ShutdownRequested);
        assert!(step.commands.is_empty());
        assert!(!step.keep_running);
        assert!(core.queue.is_empty());
    }
}
