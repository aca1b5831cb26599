#![allow(dead_code)]

use std::future::Future;
use std::time::Duration;

pub use sitepipe_test_utils::init_tracing;

/// Upper bound for any single runtime test; a hang means a lost event.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_DEADLINE, f).await {
        Ok(value) => value,
        Err(_) => panic!("no result within {TEST_DEADLINE:?}; an event was probably dropped"),
    }
}
