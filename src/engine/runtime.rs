// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::reload::ReloadNotifier;
use crate::tasks::BuildTask;

use super::core::CoreRuntime;
use super::{CoreCommand, RunSummary, RuntimeEvent};

/// Async IO shell around [`CoreRuntime`].
///
/// Reads events from the channel, feeds them to the core, then runs the
/// returned commands: build tasks go to the `ExecutorBackend`, reload
/// messages to the `ReloadNotifier`.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    notifier: Arc<dyn ReloadNotifier>,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
        notifier: Arc<dyn ReloadNotifier>,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
            notifier,
        }
    }

    /// Main event loop. Returns the session totals once the core asks to
    /// stop or every sender is gone.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("sitepipe runtime started");

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");

            let step = self.core.step(event);
            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        let summary = self.core.summary();
        info!(
            tasks = summary.tasks_run,
            failed_files = summary.failed_files,
            "runtime exiting"
        );
        Ok(summary)
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::RunTask(task) => self.spawn_task(task).await?,
            CoreCommand::Reload(message) => {
                debug!(?message, "sending reload");
                self.notifier.notify(&message);
            }
            CoreCommand::RequestExit => debug!("core issued RequestExit"),
        }
        Ok(())
    }

    async fn spawn_task(&mut self, task: BuildTask) -> Result<()> {
        info!(task = %task.name, "running task");
        self.executor.spawn_task(task).await
    }
}
