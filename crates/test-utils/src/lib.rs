//! Shared fixtures for sitepipe's integration tests.

pub mod builders;
pub mod fake_executor;
pub mod notifier;
pub mod site;

use std::sync::Once;

use sitepipe::logging::LOG_ENV;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install a test-captured subscriber once per test binary.
///
/// Quiet by default; set `SITEPIPE_LOG=debug` to see runtime decisions in
/// failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = std::env::var(LOG_ENV)
            .ok()
            .and_then(|s| EnvFilter::try_new(s).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
