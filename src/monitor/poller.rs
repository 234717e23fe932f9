// src/monitor/poller.rs

//! Drive a single execution to a terminal observation.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::client::{ExecutionId, RemoteTaskClient, TaskState, TaskStatus};
use crate::monitor::PollConfig;

/// Status fetches attempted before an execution is given up on.
pub const FETCH_ATTEMPTS: u32 = 3;

/// Fixed pause between two failed status fetches.
pub const FETCH_RETRY_DELAY: Duration = Duration::from_millis(10_000);

/// How long a never-started execution may sit in `Waiting` before it is
/// presumed disabled.
pub const WAITING_GRACE: Duration = Duration::from_millis(45_000);

/// Task-name marker the server uses for tasks whose work is disabled.
pub const WORK_DISABLED_MARKER: &str = "(work disabled)";

/// How a poll ended.
///
/// Giving up after failed fetches and running out of time are kept apart:
/// the first has nothing to report, the second still carries the last
/// observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A terminal state was observed.
    Finished(TaskStatus),
    /// Still `Waiting`, but marked "(work disabled)" or never started within
    /// the wait budget.
    PresumedDisabled(TaskStatus),
    /// The timeout elapsed; holds the last observation.
    TimedOut(TaskStatus),
    /// Every fetch attempt failed.
    Unobservable,
}

impl PollOutcome {
    pub fn status(&self) -> Option<&TaskStatus> {
        match self {
            PollOutcome::Finished(s) | PollOutcome::PresumedDisabled(s) | PollOutcome::TimedOut(s) => {
                Some(s)
            }
            PollOutcome::Unobservable => None,
        }
    }

    pub fn into_status(self) -> Option<TaskStatus> {
        match self {
            PollOutcome::Finished(s) | PollOutcome::PresumedDisabled(s) | PollOutcome::TimedOut(s) => {
                Some(s)
            }
            PollOutcome::Unobservable => None,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, PollOutcome::TimedOut(_))
    }
}

/// Number of extra `Waiting` observations tolerated before the
/// never-started heuristic applies: `max(ceil(45s / interval), 2)`.
pub fn wait_budget(poll_interval: Duration) -> i64 {
    let interval_ms = poll_interval.as_millis().max(1);
    let budget = WAITING_GRACE.as_millis().div_ceil(interval_ms);
    i64::try_from(budget).unwrap_or(i64::MAX).max(2)
}

enum Step {
    Finished,
    PresumedDisabled,
    KeepPolling,
}

/// Polls one execution at a time on behalf of the orchestrator.
pub struct StatusPoller<'a, C: ?Sized> {
    client: &'a C,
    config: PollConfig,
}

impl<'a, C: RemoteTaskClient + ?Sized> StatusPoller<'a, C> {
    pub fn new(client: &'a C, config: PollConfig) -> Self {
        Self { client, config }
    }

    /// Poll `exec_id` until it reaches a terminal state, every fetch attempt
    /// fails, or the configured timeout elapses.
    pub async fn poll(&self, exec_id: ExecutionId) -> PollOutcome {
        // A timeout too large to represent means no deadline.
        let deadline = Instant::now().checked_add(self.config.timeout);
        let mut budget = wait_budget(self.config.poll_interval);
        let mut announced = false;

        loop {
            let Some(status) = self.fetch(exec_id).await else {
                warn!(%exec_id, "unable to get task status");
                return PollOutcome::Unobservable;
            };

            if !announced {
                debug!(%exec_id, task = %status.task_name, "checking the status of task");
                announced = true;
            }

            match step(&status, &mut budget) {
                Step::Finished => {
                    info!(
                        %exec_id,
                        task = %status.task_name,
                        state = %status.state,
                        "the task execution ended"
                    );
                    return PollOutcome::Finished(status);
                }
                Step::PresumedDisabled => {
                    info!(
                        %exec_id,
                        task = %status.task_name,
                        "the task execution ended (disabled)"
                    );
                    return PollOutcome::PresumedDisabled(status);
                }
                Step::KeepPolling => {}
            }

            sleep(self.config.poll_interval).await;

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!(
                    %exec_id,
                    task = %status.task_name,
                    state = %status.state,
                    "the task did not complete in time"
                );
                return PollOutcome::TimedOut(status);
            }
        }
    }

    /// Fetch with transient-error retry. `None` once every attempt failed.
    async fn fetch(&self, exec_id: ExecutionId) -> Option<TaskStatus> {
        for attempt in 1..=FETCH_ATTEMPTS {
            match self.client.status(exec_id).await {
                Ok(status) => return Some(status),
                Err(err) => {
                    let retries = FETCH_ATTEMPTS - attempt;
                    error!(
                        %exec_id,
                        attempt,
                        retries,
                        error = %err,
                        "error while checking the status of task"
                    );
                    if retries > 0 {
                        sleep(FETCH_RETRY_DELAY).await;
                    }
                }
            }
        }
        None
    }
}

fn step(status: &TaskStatus, budget: &mut i64) -> Step {
    match status.state {
        TaskState::Completed | TaskState::Warning => Step::Finished,
        TaskState::Failed => {
            debug!(task = %status.task_name, "failed!");
            Step::Finished
        }
        TaskState::Aborting => {
            debug!(task = %status.task_name, "aborted!");
            Step::Finished
        }
        TaskState::Disabled => {
            debug!(task = %status.task_name, "disabled!");
            Step::Finished
        }
        TaskState::Unrunnable => {
            debug!(task = %status.task_name, "unrunnable!");
            Step::Finished
        }
        TaskState::Waiting => {
            if status.task_name.contains(WORK_DISABLED_MARKER) {
                debug!(task = %status.task_name, "disabled!");
                return Step::PresumedDisabled;
            }
            *budget -= 1;
            if *budget < 0 && !status.has_started() {
                warn!(
                    task = %status.task_name,
                    "task never started while waiting; presuming it is disabled"
                );
                return Step::PresumedDisabled;
            }
            Step::KeepPolling
        }
        TaskState::Running | TaskState::Unknown => Step::KeepPolling,
    }
}
