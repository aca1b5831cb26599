// src/exec/executor_loop.rs

//! Background loop that compiles one class at a time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::engine::RuntimeEvent;
use crate::pipeline::{Pipeline, TaskReport};
use crate::tasks::BuildTask;

/// Spawn the executor loop and return the sender the backend feeds.
///
/// Tasks run strictly one after another. Compilation is blocking work
/// (filesystem, lightningcss, oxc, tera), so each run goes through
/// `spawn_blocking`.
pub fn spawn_executor(
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    pipeline: Arc<Pipeline>,
) -> mpsc::Sender<BuildTask> {
    let (tx, mut rx) = mpsc::channel::<BuildTask>(32);

    tokio::spawn(async move {
        info!("executor loop started");

        while let Some(task) = rx.recv().await {
            let report = run_build_task(&pipeline, task).await;
            if runtime_tx
                .send(RuntimeEvent::TaskCompleted { report })
                .await
                .is_err()
            {
                break;
            }
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}

async fn run_build_task(pipeline: &Arc<Pipeline>, task: BuildTask) -> TaskReport {
    let pipeline = Arc::clone(pipeline);
    let class = task.class;
    match tokio::task::spawn_blocking(move || pipeline.run_class(class)).await {
        Ok(report) => report,
        Err(err) => {
            error!(task = %task.name, "build task panicked: {err}");
            TaskReport {
                task: task.name,
                class,
                reload: class.reload_kind(),
                written: Vec::new(),
                failed: 1,
            }
        }
    }
}
