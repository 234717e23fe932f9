#![allow(dead_code)]

use edxrun::client::{ExecutionId, TaskInfo, TaskState, TaskStatus, ServiceInfo};
use uuid::Uuid;

/// Deterministic execution ID for tests.
pub fn exec(n: u128) -> ExecutionId {
    ExecutionId(Uuid::from_u128(n))
}

/// Builder for `TaskStatus`.
pub struct StatusBuilder {
    status: TaskStatus,
}

impl StatusBuilder {
    /// A started, childless `Completed` status named `task-<n>`.
    pub fn new(n: u128) -> Self {
        Self {
            status: TaskStatus {
                exec_id: exec(n),
                task_id: format!("id-{n}"),
                task_name: format!("task-{n}"),
                state: TaskState::Completed,
                start_time: "2024-01-01 10:00:00".to_string(),
                child_execution_ids: vec![],
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.status.task_name = name.to_string();
        self
    }

    pub fn state(mut self, state: TaskState) -> Self {
        self.status.state = state;
        self
    }

    pub fn not_started(mut self) -> Self {
        self.status.start_time.clear();
        self
    }

    pub fn child(mut self, n: u128) -> Self {
        self.status.child_execution_ids.push(exec(n));
        self
    }

    pub fn children(mut self, ns: &[u128]) -> Self {
        self.status
            .child_execution_ids
            .extend(ns.iter().map(|&n| exec(n)));
        self
    }

    pub fn build(self) -> TaskStatus {
        self.status
    }
}

/// Shorthand for a started, childless status in the given state.
pub fn status(n: u128, state: TaskState) -> TaskStatus {
    StatusBuilder::new(n).state(state).build()
}

pub fn service(n: u128, name: &str) -> ServiceInfo {
    ServiceInfo {
        id: Uuid::from_u128(n),
        name: name.to_string(),
    }
}

pub fn task_info(n: u128, name: &str, service: &ServiceInfo, enabled: bool) -> TaskInfo {
    TaskInfo {
        id: Uuid::from_u128(n),
        name: name.to_string(),
        enabled,
        task_type: "External Event".to_string(),
        service_id: service.id,
    }
}
