#![allow(dead_code)]

pub use edxrun_test_utils::builders;
pub use edxrun_test_utils::scripted_client::{Call, Reply, ScriptedClient};
pub use edxrun_test_utils::{init_tracing, with_timeout};

use std::time::Duration;

use edxrun::monitor::PollConfig;

pub fn poll_config(interval_ms: u64, timeout_secs: u64) -> PollConfig {
    PollConfig {
        poll_interval: Duration::from_millis(interval_ms),
        timeout: Duration::from_secs(timeout_secs),
    }
}

/// Gaps between consecutive instants.
pub fn gaps(times: &[tokio::time::Instant]) -> Vec<Duration> {
    times.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Paused-clock durations can land a millisecond late due to timer rounding.
pub fn assert_approx(actual: Duration, expected: Duration) {
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(
        diff <= Duration::from_millis(1),
        "expected ~{expected:?}, got {actual:?}"
    );
}

pub fn assert_gaps(times: &[tokio::time::Instant], expected: &[Duration]) {
    let actual = gaps(times);
    assert_eq!(actual.len(), expected.len(), "gaps: {actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert_approx(*a, *e);
    }
}
