// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Name of the task that compiles once, then watches and serves.
pub const WATCH_TASK: &str = "watch";

/// Name of the task run when none is given.
pub const DEFAULT_TASK: &str = "default";

/// Command-line arguments for `sitepipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitepipe",
    version,
    about = "Compile styles, scripts, templates and images for the homepage, and live-reload on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run: a built-in (`styles`, `scripts`, `templates`, `images`),
    /// an alias from `[alias]`, or `watch`.
    #[arg(value_name = "TASK", default_value = DEFAULT_TASK)]
    pub task: String,

    /// Path to the config file (TOML).
    ///
    /// Default: `Sitepipe.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Sitepipe.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SITEPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve tasks and print what would be built, without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// In `watch` mode, do not start the development server or live reload.
    #[arg(long)]
    pub no_serve: bool,
}

impl CliArgs {
    pub fn is_watch(&self) -> bool {
        self.task == WATCH_TASK
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
