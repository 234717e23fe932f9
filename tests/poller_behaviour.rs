// tests/poller_behaviour.rs

mod common;
use crate::common::builders::{StatusBuilder, exec, status};
use crate::common::{Reply, ScriptedClient, assert_approx, assert_gaps, init_tracing, poll_config};

use std::time::Duration;

use edxrun::client::{TaskState, TriggerOutcome};
use edxrun::monitor::poller::wait_budget;
use edxrun::monitor::{PollOutcome, StatusPoller};
use tokio::time::Instant;

fn client() -> ScriptedClient {
    ScriptedClient::new(TriggerOutcome::started(exec(1)))
}

#[tokio::test(start_paused = true)]
async fn completed_on_first_fetch_returns_that_status_without_sleeping() {
    init_tracing();

    let client = client().always(status(1, TaskState::Completed));
    let poller = StatusPoller::new(&client, poll_config(5_000, 3_600));

    let started = Instant::now();
    let outcome = poller.poll(exec(1)).await;

    assert_eq!(outcome, PollOutcome::Finished(status(1, TaskState::Completed)));
    assert_eq!(client.status_calls_for(exec(1)).len(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn waiting_twice_then_completed_sleeps_exactly_twice() {
    init_tracing();

    let waiting = status(1, TaskState::Waiting);
    let client = client().sequence(vec![
        waiting.clone(),
        waiting,
        status(1, TaskState::Completed),
    ]);
    let poller = StatusPoller::new(&client, poll_config(1_000, 3_600));

    let started = Instant::now();
    let outcome = poller.poll(exec(1)).await;

    assert!(matches!(outcome, PollOutcome::Finished(ref s) if s.state == TaskState::Completed));
    let calls = client.status_calls_for(exec(1));
    assert_eq!(calls.len(), 3);
    assert_gaps(&calls, &[Duration::from_millis(1_000); 2]);
    assert_approx(started.elapsed(), Duration::from_millis(2_000));
}

#[tokio::test(start_paused = true)]
async fn always_failing_fetch_gives_up_after_three_attempts() {
    init_tracing();

    let client = client().script(exec(1), vec![Reply::Fail("connection reset".into())]);
    let poller = StatusPoller::new(&client, poll_config(5_000, 3_600));

    let outcome = poller.poll(exec(1)).await;

    assert_eq!(outcome, PollOutcome::Unobservable);
    assert_eq!(outcome.status(), None);
    let calls = client.status_calls_for(exec(1));
    assert_eq!(calls.len(), 3);
    assert_gaps(&calls, &[Duration::from_secs(10); 2]);
}

#[tokio::test(start_paused = true)]
async fn transient_fetch_error_is_retried_locally() {
    init_tracing();

    let client = client().script(
        exec(1),
        vec![
            Reply::Fail("timeout".into()),
            Reply::Status(status(1, TaskState::Completed)),
        ],
    );
    let poller = StatusPoller::new(&client, poll_config(5_000, 3_600));

    let outcome = poller.poll(exec(1)).await;

    assert!(matches!(outcome, PollOutcome::Finished(_)));
    let calls = client.status_calls_for(exec(1));
    assert_gaps(&calls, &[Duration::from_secs(10)]);
}

#[tokio::test(start_paused = true)]
async fn never_started_waiting_task_is_presumed_disabled_once_budget_is_spent() {
    init_tracing();

    let stuck = StatusBuilder::new(1)
        .state(TaskState::Waiting)
        .not_started()
        .build();
    let client = client().always(stuck.clone());
    let poller = StatusPoller::new(&client, poll_config(5_000, 3_600));

    let started = Instant::now();
    let outcome = poller.poll(exec(1)).await;

    assert_eq!(outcome, PollOutcome::PresumedDisabled(stuck));
    // Budget of 9: the 10th waiting observation ends the poll.
    assert_eq!(client.status_calls_for(exec(1)).len(), 10);
    assert_approx(started.elapsed(), Duration::from_secs(45));
}

#[tokio::test(start_paused = true)]
async fn started_waiting_task_is_polled_until_timeout() {
    init_tracing();

    let waiting = status(1, TaskState::Waiting);
    let client = client().always(waiting.clone());
    let poller = StatusPoller::new(&client, poll_config(5_000, 60));

    let outcome = poller.poll(exec(1)).await;

    assert!(outcome.is_timed_out());
    assert_eq!(outcome.into_status(), Some(waiting));
    // Fetches at 0s, 5s, ..., 55s; the sleep ending at 60s hits the deadline.
    assert_eq!(client.status_calls_for(exec(1)).len(), 12);
}

#[tokio::test(start_paused = true)]
async fn work_disabled_marker_ends_polling_immediately() {
    init_tracing();

    let disabled = StatusBuilder::new(1)
        .name("Reload sales (work disabled)")
        .state(TaskState::Waiting)
        .build();
    let client = client().always(disabled.clone());
    let poller = StatusPoller::new(&client, poll_config(5_000, 3_600));

    let outcome = poller.poll(exec(1)).await;

    assert_eq!(outcome, PollOutcome::PresumedDisabled(disabled));
    assert_eq!(client.status_calls_for(exec(1)).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_terminal_state_stops_polling_at_once() {
    init_tracing();

    for state in [
        TaskState::Completed,
        TaskState::Warning,
        TaskState::Failed,
        TaskState::Aborting,
        TaskState::Disabled,
        TaskState::Unrunnable,
    ] {
        let client = client().always(status(1, state));
        let poller = StatusPoller::new(&client, poll_config(5_000, 3_600));

        let outcome = poller.poll(exec(1)).await;

        assert_eq!(outcome, PollOutcome::Finished(status(1, state)), "state {state}");
        assert_eq!(client.status_calls_for(exec(1)).len(), 1, "state {state}");
    }
}

#[tokio::test(start_paused = true)]
async fn running_and_unknown_states_keep_polling() {
    init_tracing();

    let client = client().sequence(vec![
        status(1, TaskState::Running),
        status(1, TaskState::Unknown),
        status(1, TaskState::Failed),
    ]);
    let poller = StatusPoller::new(&client, poll_config(2_000, 3_600));

    let outcome = poller.poll(exec(1)).await;

    assert_eq!(outcome, PollOutcome::Finished(status(1, TaskState::Failed)));
    let calls = client.status_calls_for(exec(1));
    assert_gaps(&calls, &[Duration::from_secs(2); 2]);
}

#[test]
fn wait_budget_is_ceiling_of_grace_over_interval_with_floor_of_two() {
    assert_eq!(wait_budget(Duration::from_millis(5_000)), 9);
    assert_eq!(wait_budget(Duration::from_millis(1_000)), 45);
    assert_eq!(wait_budget(Duration::from_millis(7_000)), 7);
    assert_eq!(wait_budget(Duration::from_millis(30_000)), 2);
    assert_eq!(wait_budget(Duration::from_millis(60_000)), 2);
}

#[tokio::test(start_paused = true)]
async fn unrepresentable_timeout_polls_without_a_deadline() {
    init_tracing();

    let client = client().sequence(vec![
        status(1, TaskState::Running),
        status(1, TaskState::Completed),
    ]);
    let poller = StatusPoller::new(
        &client,
        edxrun::monitor::PollConfig {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(u64::MAX),
        },
    );

    let outcome = poller.poll(exec(1)).await;

    assert_eq!(outcome, PollOutcome::Finished(status(1, TaskState::Completed)));
    assert_eq!(client.status_calls_for(exec(1)).len(), 2);
}
