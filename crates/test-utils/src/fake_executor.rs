use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use sitepipe::engine::RuntimeEvent;
use sitepipe::errors::{Result, SitepipeError};
use sitepipe::exec::ExecutorBackend;
use sitepipe::pipeline::{Pipeline, TaskReport};
use sitepipe::tasks::BuildTask;

/// A fake executor that:
/// - records which tasks were run
/// - completes each task inline, either through a real `Pipeline` (usually
///   over a `MockFileSystem`) or with an empty successful report.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    pipeline: Option<Arc<Pipeline>>,
}

impl FakeExecutor {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            runtime_tx,
            executed,
            pipeline: None,
        }
    }

    pub fn with_pipeline(mut self, pipeline: Arc<Pipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }
}

impl ExecutorBackend for FakeExecutor {
    fn spawn_task(
        &mut self,
        task: BuildTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let pipeline = self.pipeline.clone();

        Box::pin(async move {
            executed.lock().unwrap().push(task.name.clone());

            let report = match pipeline {
                Some(p) => p.run_class(task.class),
                None => TaskReport {
                    task: task.name.clone(),
                    class: task.class,
                    reload: task.class.reload_kind(),
                    written: Vec::new(),
                    failed: 0,
                },
            };

            tx.send(RuntimeEvent::TaskCompleted { report })
                .await
                .map_err(|_| SitepipeError::ChannelClosed("runtime"))
        })
    }
}
