// src/monitor/orchestrator.rs

//! Sequence trigger, root poll, subtask walk and verdict for one run.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::client::{RemoteTaskClient, TaskState, TriggerRequest, TriggerStartResult};
use crate::errors::Result;
use crate::monitor::aggregate::{Summary, aggregate};
use crate::monitor::poller::{PollOutcome, StatusPoller};
use crate::monitor::subtasks::{MonitorSummary, SubtaskMonitor};
use crate::monitor::{AccumulatedStatuses, PollConfig};

/// Per-run switches that are not about polling itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Report success as soon as the trigger is accepted.
    pub no_wait: bool,
    /// Pause before returning, whatever the verdict.
    pub post_run_delay: Duration,
}

/// Where a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Connecting to the management service failed.
    ConnectFailed(String),
    /// The trigger call itself failed.
    TriggerFailed(String),
    /// The server refused to start the task.
    Rejected(String),
    /// Triggered in no-wait mode; nothing was polled.
    Started,
    /// The root execution could not be observed.
    RootUnobservable,
    /// The root and its triggered executions were polled.
    Monitored {
        root: PollOutcome,
        subtasks: MonitorSummary,
    },
}

/// Everything one run produced. Never an error: failures are part of the
/// report and fold into `success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub success: bool,
    pub outcome: RunOutcome,
    pub statuses: AccumulatedStatuses,
    pub summary: Summary,
}

impl RunReport {
    fn failed(outcome: RunOutcome) -> Self {
        Self {
            success: false,
            outcome,
            statuses: AccumulatedStatuses::new(),
            summary: Summary::default(),
        }
    }

    /// Process exit code for this report.
    pub fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }
}

/// Runs one trigger-and-monitor cycle against an already connected client.
pub struct Orchestrator<'a, C: ?Sized> {
    client: &'a C,
    poll: PollConfig,
    options: RunOptions,
}

impl<'a, C: RemoteTaskClient + ?Sized> Orchestrator<'a, C> {
    pub fn new(client: &'a C, poll: PollConfig, options: RunOptions) -> Self {
        Self {
            client,
            poll,
            options,
        }
    }

    /// Trigger the task, then poll it and everything it triggers.
    ///
    /// Does not apply the post-run delay; see [`trigger_and_monitor`].
    pub async fn run(&self, request: &TriggerRequest) -> RunReport {
        let task = request.task.as_str();

        let triggered = match self.client.trigger(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(task, error = %err, "error while starting task");
                return RunReport::failed(RunOutcome::TriggerFailed(err.to_string()));
            }
        };

        let exec_id = match (triggered.start_result, triggered.exec_id) {
            (TriggerStartResult::Success, Some(exec_id)) => exec_id,
            (TriggerStartResult::Success, None) => {
                error!(task, "server accepted the task but returned no execution id");
                return RunReport::failed(RunOutcome::Rejected(
                    "missing execution id".to_string(),
                ));
            }
            (TriggerStartResult::Rejected(reason), _) => {
                error!(task, %reason, "failed to start the task");
                return RunReport::failed(RunOutcome::Rejected(reason));
            }
        };
        info!(task, %exec_id, "task successfully started");

        if self.options.no_wait {
            debug!(task, "not waiting for task completion");
            return RunReport {
                success: true,
                outcome: RunOutcome::Started,
                statuses: AccumulatedStatuses::new(),
                summary: Summary::default(),
            };
        }

        let poller = StatusPoller::new(self.client, self.poll);
        let root = poller.poll(exec_id).await;
        let Some(root_status) = root.status().cloned() else {
            return RunReport::failed(RunOutcome::RootUnobservable);
        };

        let mut statuses = AccumulatedStatuses::new();
        statuses.push(root_status.clone());
        let subtasks = SubtaskMonitor::new(&poller)
            .monitor(&root_status, &mut statuses)
            .await;

        let verdict = aggregate(root_status.state == TaskState::Completed, &statuses);

        RunReport {
            success: verdict.success,
            outcome: RunOutcome::Monitored { root, subtasks },
            statuses,
            summary: verdict.summary,
        }
    }
}

/// Connect, run one cycle, then honour the post-run delay.
///
/// A failed connection is reported like any other failure.
pub async fn trigger_and_monitor<C, F>(
    connect: F,
    request: &TriggerRequest,
    poll: PollConfig,
    options: RunOptions,
) -> RunReport
where
    C: RemoteTaskClient,
    F: Future<Output = Result<C>>,
{
    let report = match connect.await {
        Ok(client) => {
            Orchestrator::new(&client, poll, options)
                .run(request)
                .await
        }
        Err(err) => {
            error!(error = %err, "failed to create a client to the management service");
            RunReport::failed(RunOutcome::ConnectFailed(err.to_string()))
        }
    };

    if !options.post_run_delay.is_zero() {
        debug!(delay = ?options.post_run_delay, "delaying exit");
        tokio::time::sleep(options.post_run_delay).await;
    }

    report
}
