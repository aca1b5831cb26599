// src/exec/backend.rs

//! Pluggable executor backend.
//!
//! The runtime hands build tasks to an `ExecutorBackend` instead of a raw
//! channel, so tests can swap in a backend that completes tasks inline.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::engine::RuntimeEvent;
use crate::errors::{Result, SitepipeError};
use crate::pipeline::Pipeline;
use crate::tasks::BuildTask;

use super::executor_loop::spawn_executor;

/// How build tasks get executed.
///
/// Implementations must eventually answer every task with a
/// `RuntimeEvent::TaskCompleted`.
pub trait ExecutorBackend: Send {
    fn spawn_task(
        &mut self,
        task: BuildTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: forwards tasks to the background executor loop.
pub struct RealExecutorBackend {
    tx: mpsc::Sender<BuildTask>,
}

impl RealExecutorBackend {
    /// Spawns the executor loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, pipeline: Arc<Pipeline>) -> Self {
        let tx = spawn_executor(runtime_tx, pipeline);
        Self { tx }
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn spawn_task(
        &mut self,
        task: BuildTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();
        Box::pin(async move {
            tx.send(task)
                .await
                .map_err(|_| SitepipeError::ChannelClosed("executor"))
        })
    }
}
