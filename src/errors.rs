// src/errors.rs

//! Errors surfaced by config loading, task resolution and the runtime.
//!
//! Per-file compile failures are not errors at this level: they are logged
//! and counted in a [`crate::pipeline::TaskReport`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitepipeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unknown task: {0}")]
    TaskNotFound(String),

    #[error("Cycle detected in task aliases: {0}")]
    TaskCycle(String),

    /// The executor or runtime went away while a task was being handed over.
    #[error("{0} channel closed")]
    ChannelClosed(&'static str),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SitepipeError>;
