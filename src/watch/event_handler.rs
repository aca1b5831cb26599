// src/watch/event_handler.rs

//! Turning one changed path into task triggers.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::{RuntimeEvent, TriggerReason};
use crate::fs::FileSystem;
use crate::watch::cache::FileCache;
use crate::watch::hash::compute_file_hash;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::{WatchBinding, bound_tasks};

/// Shared state for the watcher's event task.
#[derive(Debug, Clone)]
pub struct WatchContext {
    pub fs: Arc<dyn FileSystem>,
    pub root: PathBuf,
    pub bindings: Arc<Vec<WatchBinding>>,
    /// Paths under these directories never trigger (build outputs).
    pub ignored: Arc<Vec<PathBuf>>,
    pub cache: Arc<Mutex<FileCache>>,
}

/// Handle one changed path.
///
/// 1. Relativize against the watch root and drop ignored paths.
/// 2. Find the bound tasks.
/// 3. Skip if the file's content hash did not change since the last event.
/// 4. Send one trigger per bound task.
///
/// Returns false once the runtime channel is closed.
pub async fn process_file_change(
    ctx: &WatchContext,
    path: &Path,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    if ctx.ignored.iter().any(|dir| path.starts_with(dir)) {
        return true;
    }

    let Some(rel) = relative_str(&ctx.root, path) else {
        debug!(?path, root = ?ctx.root, "event outside watch root");
        return true;
    };

    let tasks: Vec<String> = bound_tasks(&ctx.bindings, &rel)
        .into_iter()
        .map(str::to_string)
        .collect();
    if tasks.is_empty() {
        return true;
    }

    if !content_changed(ctx, path).await {
        debug!(path = %rel, "skipping event; contents unchanged");
        return true;
    }

    for task in tasks {
        debug!(task = %task, path = %rel, "watch match -> triggering task");
        if let Err(err) = runtime_tx
            .send(RuntimeEvent::TaskTriggered {
                task,
                reason: TriggerReason::FileWatch,
            })
            .await
        {
            warn!("failed to send RuntimeEvent::TaskTriggered: {err}");
            return false;
        }
    }

    true
}

/// False only when the file is readable and hashes the same as last time.
async fn content_changed(ctx: &WatchContext, path: &Path) -> bool {
    let fs = Arc::clone(&ctx.fs);
    let cache = Arc::clone(&ctx.cache);
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        if fs.is_dir(&path) {
            return false;
        }

        let hash = compute_file_hash(fs.as_ref(), &path);
        let Ok(mut cache) = cache.lock() else {
            warn!("file cache mutex poisoned; triggering anyway");
            return true;
        };

        match hash {
            Ok(hash) => cache.record(&path, hash),
            Err(_) => {
                // Removed or renamed away.
                cache.invalidate(&path);
                true
            }
        }
    })
    .await
    .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn context(fs: Arc<MockFileSystem>) -> WatchContext {
        WatchContext {
            fs,
            root: PathBuf::from("/site/src"),
            bindings: Arc::new(vec![
                WatchBinding::new("styles", "styles/*.scss").unwrap(),
                WatchBinding::new("images", "images/**/*").unwrap(),
            ]),
            ignored: Arc::new(vec![PathBuf::from("/site/src/images/out")]),
            cache: Arc::new(Mutex::new(FileCache::new())),
        }
    }

    fn drain(rx: &mut mpsc::Receiver<RuntimeEvent>) -> Vec<String> {
        let mut names = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let RuntimeEvent::TaskTriggered { task, .. } = event {
                names.push(task);
            }
        }
        names
    }

    #[tokio::test]
    async fn duplicate_events_trigger_once() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("/site/src/styles/_vars.scss", "$c: red;");
        let ctx = context(Arc::clone(&fs));
        let (tx, mut rx) = mpsc::channel(8);
        let path = Path::new("/site/src/styles/_vars.scss");

        assert!(process_file_change(&ctx, path, &tx).await);
        assert!(process_file_change(&ctx, path, &tx).await);
        assert_eq!(drain(&mut rx), vec!["styles".to_string()]);

        fs.add_file("/site/src/styles/_vars.scss", "$c: blue;");
        process_file_change(&ctx, path, &tx).await;
        assert_eq!(drain(&mut rx), vec!["styles".to_string()]);
    }

    #[tokio::test]
    async fn removed_file_still_triggers() {
        let fs = Arc::new(MockFileSystem::new());
        let ctx = context(fs);
        let (tx, mut rx) = mpsc::channel(8);

        process_file_change(&ctx, Path::new("/site/src/images/gone.png"), &tx).await;
        assert_eq!(drain(&mut rx), vec!["images".to_string()]);
    }

    #[tokio::test]
    async fn unbound_and_ignored_paths_do_nothing() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("/site/src/notes.md", "hi");
        fs.add_file("/site/src/images/out/a.png", "x");
        let ctx = context(fs);
        let (tx, mut rx) = mpsc::channel(8);

        process_file_change(&ctx, Path::new("/site/src/notes.md"), &tx).await;
        process_file_change(&ctx, Path::new("/site/src/images/out/a.png"), &tx).await;
        process_file_change(&ctx, Path::new("/elsewhere/a.scss"), &tx).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn closed_runtime_stops_processing() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("/site/src/styles/a.scss", "a{}");
        let ctx = context(fs);
        let (tx, rx) = mpsc::channel(8);
        drop(rx);

        assert!(!process_file_change(&ctx, Path::new("/site/src/styles/a.scss"), &tx).await);
    }
}
