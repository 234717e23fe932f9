// src/monitor/mod.rs

//! Trigger-and-monitor engine.
//!
//! This module ties together:
//! - the status poller, which drives one execution to a terminal observation
//! - the subtask monitor, which walks every execution the root triggered
//! - the aggregator, which reduces all observations to one verdict
//! - the orchestrator, which sequences trigger, poll, walk and verdict
//!
//! Everything runs on a single task; the only suspension points are the
//! retry sleep and the poll-interval sleep inside [`poller`].

use std::time::Duration;

use crate::client::TaskStatus;

pub mod aggregate;
pub mod orchestrator;
pub mod poller;
pub mod subtasks;

pub use aggregate::{Summary, Verdict, aggregate};
pub use orchestrator::{Orchestrator, RunOptions, RunOutcome, RunReport, trigger_and_monitor};
pub use poller::{PollOutcome, StatusPoller};
pub use subtasks::{MonitorSummary, SubtaskMonitor};

/// Polling parameters shared by the root and every triggered execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Sleep between two status checks of a non-terminal execution.
    pub poll_interval: Duration,
    /// Budget for a single execution, applied afresh to each one.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(3600),
        }
    }
}

/// Every status observed during one run, in observation order.
///
/// The root comes first, then triggered executions level by level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedStatuses {
    statuses: Vec<TaskStatus>,
}

impl AccumulatedStatuses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, status: TaskStatus) {
        self.statuses.push(status);
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskStatus> {
        self.statuses.iter()
    }

    pub fn as_slice(&self) -> &[TaskStatus] {
        &self.statuses
    }

}

impl<'a> IntoIterator for &'a AccumulatedStatuses {
    type Item = &'a TaskStatus;
    type IntoIter = std::slice::Iter<'a, TaskStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.statuses.iter()
    }
}
