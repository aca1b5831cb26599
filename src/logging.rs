// src/logging.rs

//! Logging setup for `sitepipe` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (applies to every target)
//! 2. `SITEPIPE_LOG`, in `EnvFilter` syntax (`debug`, `sitepipe::watch=trace`)
//! 3. [`DEFAULT_FILTER`]
//!
//! Logs go to stderr; stdout is reserved for `--dry-run` output.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "SITEPIPE_LOG";

/// Build progress at `info`, chatty dependencies held back.
pub const DEFAULT_FILTER: &str = "info,globset=warn,notify=warn,tiny_http=warn";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level_directive(level));
    }
    env.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_beats_env() {
        let filter = build_filter(Some(LogLevel::Trace), Some("error"));
        assert_eq!(filter.to_string(), "trace");
    }

    #[test]
    fn env_directives_are_used() {
        let filter = build_filter(None, Some(" sitepipe::watch=debug "));
        assert_eq!(filter.to_string(), "sitepipe::watch=debug");
    }

    #[test]
    fn garbage_falls_back_to_default() {
        // EnvFilter prints directives in its own order.
        let default = EnvFilter::new(DEFAULT_FILTER).to_string();
        assert_eq!(build_filter(None, Some("=[")).to_string(), default);
        assert_eq!(build_filter(None, Some("")).to_string(), default);
        assert_eq!(build_filter(None, None).to_string(), default);
        assert!(default.contains("notify=warn"));
    }
}
