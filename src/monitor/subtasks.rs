// src/monitor/subtasks.rs

//! Walk the executions a task triggered, level by level.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::client::{ExecutionId, RemoteTaskClient, TaskStatus};
use crate::monitor::AccumulatedStatuses;
use crate::monitor::poller::StatusPoller;

/// Bookkeeping for one walk, mostly useful to tests and the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorSummary {
    /// Number of frontiers processed (0 when the parent triggered nothing).
    pub levels: usize,
    /// Executions whose status was appended.
    pub observed: usize,
    /// Executions that could not be observed at all.
    pub unobservable: usize,
    /// IDs skipped because they had already been visited.
    pub repeated: usize,
}

/// Breadth-first walk over triggered executions.
///
/// Each frontier is polled in the order the server listed the IDs; the
/// children of every observed execution form the next frontier. An ID is
/// polled at most once per walk, so a server reporting a cycle cannot make
/// the walk loop.
pub struct SubtaskMonitor<'p, 'c, C: ?Sized> {
    poller: &'p StatusPoller<'c, C>,
}

impl<'p, 'c, C: RemoteTaskClient + ?Sized> SubtaskMonitor<'p, 'c, C> {
    pub fn new(poller: &'p StatusPoller<'c, C>) -> Self {
        Self { poller }
    }

    /// Poll every execution reachable from `parent`, appending each
    /// observation to `statuses`.
    pub async fn monitor(
        &self,
        parent: &TaskStatus,
        statuses: &mut AccumulatedStatuses,
    ) -> MonitorSummary {
        let mut summary = MonitorSummary::default();
        let mut visited: HashSet<ExecutionId> = HashSet::from([parent.exec_id]);
        let mut frontier: Vec<ExecutionId> = parent.child_execution_ids.clone();

        while !frontier.is_empty() {
            summary.levels += 1;
            let depth = summary.levels;
            let mut next: Vec<ExecutionId> = Vec::new();

            for exec_id in frontier {
                if !visited.insert(exec_id) {
                    warn!(%exec_id, depth, "execution already visited; skipping");
                    summary.repeated += 1;
                    continue;
                }

                debug!(%exec_id, depth, "checking triggered task");
                match self.poller.poll(exec_id).await.into_status() {
                    Some(status) => {
                        next.extend(status.child_execution_ids.iter().copied());
                        statuses.push(status);
                        summary.observed += 1;
                    }
                    None => summary.unobservable += 1,
                }
            }

            frontier = next;
        }

        summary
    }
}
