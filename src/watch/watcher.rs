// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::fs::FileSystem;
use crate::watch::cache::FileCache;
use crate::watch::event_handler::{WatchContext, process_file_change};
use crate::watch::patterns::WatchBinding;

/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and send `RuntimeEvent::TaskTriggered` for every
/// task bound to a changed path.
///
/// - `bindings` globs are relative to `root`.
/// - Changes under any of `ignored` are dropped (build outputs living inside
///   the source tree would otherwise retrigger forever).
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    bindings: Vec<WatchBinding>,
    ignored: Vec<PathBuf>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    fs: Arc<dyn FileSystem>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);
    let ignored = ignored
        .into_iter()
        .map(|p| p.canonicalize().unwrap_or(p))
        .collect();

    // notify calls back on its own thread; hop into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("sitepipe: failed to forward notify event: {err}");
                }
            }
            Err(err) => eprintln!("sitepipe: file watch error: {err}"),
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);
    for binding in bindings.iter() {
        debug!(task = binding.task(), glob = binding.glob(), "watch binding");
    }

    let ctx = WatchContext {
        fs,
        root,
        bindings: Arc::new(bindings),
        ignored: Arc::new(ignored),
        cache: Arc::new(Mutex::new(FileCache::new())),
    };

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            debug!(?event, "received notify event");

            for path in event.paths.iter() {
                if !process_file_change(&ctx, path, &runtime_tx).await {
                    warn!("runtime channel closed; stopping watcher loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
