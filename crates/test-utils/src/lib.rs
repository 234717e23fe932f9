//! Shared fixtures for the `edxrun` integration tests.

pub mod builders;
pub mod scripted_client;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Defaults to `edxrun=debug` so poll and walk decisions show up in the
/// output of a failing test; `RUST_LOG` overrides it.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("edxrun=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}

/// Wall-clock guard for tests that talk to a real socket.
///
/// Not for paused-clock tests: the poll sleeps would trip it.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("test did not finish within 5 seconds")
}
