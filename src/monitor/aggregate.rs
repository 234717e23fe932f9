// src/monitor/aggregate.rs

//! Reduce every observation of a run to a single verdict.
//!
//! Pure: no client, no clock. Only the summary line is logged.

use tracing::debug;

use crate::client::{TaskState, TaskStatus};

/// Per-state counts, for operator visibility only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub warning: usize,
    pub aborting: usize,
}

impl Summary {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a TaskStatus>) -> Self {
        let mut summary = Summary::default();
        for status in statuses {
            summary.total += 1;
            match status.state {
                TaskState::Completed => summary.completed += 1,
                TaskState::Failed => summary.failed += 1,
                TaskState::Warning => summary.warning += 1,
                TaskState::Aborting => summary.aborting += 1,
                _ => {}
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    pub summary: Summary,
}

/// Success iff the root succeeded and no observed execution `Failed`.
///
/// Aborting, warning, disabled and unrunnable executions do not flip the
/// verdict on their own.
pub fn aggregate<'a>(
    root_succeeded: bool,
    statuses: impl IntoIterator<Item = &'a TaskStatus>,
) -> Verdict {
    let summary = Summary::from_statuses(statuses);
    let success = root_succeeded && summary.failed == 0;

    if summary.total > 0 {
        debug!("status of the triggered tasks:");
        debug!(
            "Completed:{}  Failed:{}  Warning:{}  Aborted:{}",
            summary.completed, summary.failed, summary.warning, summary.aborting
        );
    }

    Verdict { success, summary }
}
