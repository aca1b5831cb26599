// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod reload;
pub mod serve;
pub mod tasks;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, DEFAULT_TASK};
use crate::config::{ConfigFile, Layout, config_base_dir, load_and_validate};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, TriggerReason};
use crate::exec::RealExecutorBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::{Banner, Pipeline, collect_sources, is_partial};
use crate::reload::{NullNotifier, ReloadNotifier, WsReloadServer};
use crate::serve::DevServer;
use crate::tasks::{BuildTask, TaskGraph};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and the class table
/// - task resolution
/// - core runtime + executor
/// - (watch mode) file watcher, dev server, live reload
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let layout = cfg.layout(&config_base_dir(&config_path));

    let banner = Banner::for_project(&cfg.project);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let pipeline = Arc::new(Pipeline::from_config(&cfg, &layout, &banner, Arc::clone(&fs))?);

    let graph = TaskGraph::from_config(&cfg);
    let watching = args.is_watch();
    let entry = if watching { DEFAULT_TASK } else { args.task.as_str() };
    let tasks = graph.resolve(entry)?;
    info!(task = %args.task, resolved = ?task_names(&tasks), "resolved task");

    if args.dry_run {
        print_dry_run(&cfg, &layout, &pipeline, &tasks, watching, fs.as_ref())?;
        return Ok(());
    }

    if tasks.is_empty() {
        warn!(task = %args.task, "nothing to run");
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let executor = RealExecutorBackend::new(rt_tx.clone(), Arc::clone(&pipeline));

    // Watch-mode services; the handles must outlive the runtime.
    let mut notifier: Arc<dyn ReloadNotifier> = Arc::new(NullNotifier);
    let mut _watcher_handle = None;
    let mut _dev_server = None;

    if watching {
        let watched = tasks
            .iter()
            .filter_map(|t| pipeline.class(t.class));
        let bindings = crate::watch::build_watch_bindings(watched, &layout.src)?;
        _watcher_handle = Some(crate::watch::spawn_watcher(
            layout.src.clone(),
            bindings,
            vec![layout.build.clone()],
            rt_tx.clone(),
            Arc::clone(&fs),
        )?);

        if cfg.serve.enabled && !args.no_serve {
            let reload = WsReloadServer::bind(cfg.serve.reload_port)?;
            _dev_server = Some(DevServer::start(
                layout.root.clone(),
                cfg.serve.port,
                Some(reload.port()),
            )?);
            notifier = Arc::new(reload);
        } else {
            debug!("dev server and live reload disabled");
        }
    }

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // Seed the initial build.
    for task in tasks.iter() {
        rt_tx
            .send(RuntimeEvent::TaskTriggered {
                task: task.name.clone(),
                reason: TriggerReason::Manual,
            })
            .await?;
    }

    let options = RuntimeOptions {
        exit_when_idle: !watching,
    };
    let core = CoreRuntime::new(options);
    let runtime = Runtime::new(core, rt_rx, executor, notifier);
    let summary = runtime.run().await?;

    if !watching && summary.failed_files > 0 {
        bail!(
            "{} file(s) failed to compile in task '{}'",
            summary.failed_files,
            args.task
        );
    }

    Ok(())
}

fn task_names(tasks: &[BuildTask]) -> Vec<&str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}

/// Print resolved tasks, their chains, watch bindings and the files each
/// would compile. Writes nothing.
fn print_dry_run(
    cfg: &ConfigFile,
    layout: &Layout,
    pipeline: &Pipeline,
    tasks: &[BuildTask],
    watching: bool,
    fs: &dyn FileSystem,
) -> Result<()> {
    println!("sitepipe dry-run");
    println!("  src   = {}", layout.src.display());
    println!("  build = {}", layout.build.display());
    println!("  root  = {}", layout.root.display());
    println!();

    println!("tasks ({}):", tasks.len());
    for task in tasks {
        let Some(class) = pipeline.class(task.class) else {
            continue;
        };
        println!("  - {}", task.name);
        println!("      source: {}/{}", rel_display(&class.source_dir, layout), class.pattern);
        println!("      chain: {:?}", class.chain_names());
        println!("      dest: {}", rel_display(&class.dest_dir, layout));
        println!("      reload: {:?}", class.reload);

        let sources = collect_sources(fs, &class.source_dir, &class.matcher)?;
        for source in sources.iter() {
            let marker = if task.class.has_partials() && is_partial(&source.rel_path) {
                " (partial)"
            } else {
                ""
            };
            println!("      file: {}{marker}", source.rel_str());
        }
    }

    if watching {
        println!();
        println!("watch bindings:");
        let watched = tasks.iter().filter_map(|t| pipeline.class(t.class));
        for binding in crate::watch::build_watch_bindings(watched, &layout.src)? {
            println!("  - {} -> {}", binding.glob(), binding.task());
        }
        if cfg.serve.enabled {
            println!(
                "serve: http://127.0.0.1:{}/ (reload port {})",
                cfg.serve.port, cfg.serve.reload_port
            );
        }
    }

    if !cfg.aliases().is_empty() {
        println!();
        println!("aliases:");
        for (name, members) in cfg.aliases() {
            println!("  - {name} = {members:?}");
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}

fn rel_display(path: &Path, layout: &Layout) -> String {
    let base = layout.src.parent().unwrap_or(Path::new(""));
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
