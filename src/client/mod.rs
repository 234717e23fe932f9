// src/client/mod.rs

//! Remote management-service client abstraction.
//!
//! The monitoring core talks to a [`RemoteTaskClient`] instead of a concrete
//! HTTP client. This makes it easy to swap in a scripted fake in tests while
//! keeping the production transport in [`http`].
//!
//! - [`HttpTaskClient`] is the implementation used by `edxrun`. It performs
//!   the service-key handshake once and attaches the key to every request.
//! - Tests can provide their own client that replays canned statuses and
//!   records which execution IDs were polled.

pub mod http;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;

pub use http::HttpTaskClient;

/// Boxed future returned by the client traits.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Opaque identifier of one execution of a task on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub Uuid);

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for ExecutionId {
    fn from(id: Uuid) -> Self {
        ExecutionId(id)
    }
}

/// State of a task execution as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    Waiting,
    Running,
    Completed,
    Failed,
    Aborting,
    Warning,
    Disabled,
    Unrunnable,
    /// Any state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A point-in-time observation of one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub exec_id: ExecutionId,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(rename = "taskStatus")]
    pub state: TaskState,
    /// Empty while the execution has not started yet.
    #[serde(default)]
    pub start_time: String,
    /// Executions triggered by this one, in the order the server lists them.
    #[serde(rename = "triggeredExecIds", default)]
    pub child_execution_ids: Vec<ExecutionId>,
}

impl TaskStatus {
    pub fn has_started(&self) -> bool {
        !self.start_time.is_empty()
    }
}

/// Result code of a trigger call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerStartResult {
    Success,
    /// Any other code, kept verbatim for reporting.
    Rejected(String),
}

impl From<String> for TriggerStartResult {
    fn from(code: String) -> Self {
        if code == "Success" {
            TriggerStartResult::Success
        } else {
            TriggerStartResult::Rejected(code)
        }
    }
}

impl From<TriggerStartResult> for String {
    fn from(result: TriggerStartResult) -> Self {
        match result {
            TriggerStartResult::Success => "Success".to_string(),
            TriggerStartResult::Rejected(code) => code,
        }
    }
}

/// What the server answered to a trigger call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOutcome {
    pub start_result: TriggerStartResult,
    #[serde(default)]
    pub exec_id: Option<ExecutionId>,
}

impl TriggerOutcome {
    pub fn started(exec_id: ExecutionId) -> Self {
        Self {
            start_result: TriggerStartResult::Success,
            exec_id: Some(exec_id),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            start_result: TriggerStartResult::Rejected(reason.into()),
            exec_id: None,
        }
    }
}

/// Parameters of a single trigger call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerRequest {
    /// Task name or permanent ID.
    pub task: String,
    pub password: String,
    pub variable_name: String,
    pub variable_values: Vec<String>,
}

/// A distribution service known to the management service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub id: Uuid,
    pub name: String,
}

/// A task definition as listed by the management service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub task_type: String,
    pub service_id: Uuid,
}

/// Trigger and status calls used by the monitoring core.
pub trait RemoteTaskClient: Send + Sync {
    /// Start one execution of the given task.
    fn trigger<'a>(&'a self, request: &'a TriggerRequest) -> ClientFuture<'a, TriggerOutcome>;

    /// Fetch the current status of an execution.
    ///
    /// Errors are transport failures; the poller retries them.
    fn status(&self, exec_id: ExecutionId) -> ClientFuture<'_, TaskStatus>;
}

/// Enumeration calls used by `edxrun list`.
pub trait TaskCatalog: Send + Sync {
    /// All distribution services.
    fn services(&self) -> ClientFuture<'_, Vec<ServiceInfo>>;

    /// Every task defined on one distribution service.
    fn tasks(&self, service_id: Uuid) -> ClientFuture<'_, Vec<TaskInfo>>;

    /// EDX-enabled tasks with the given name, across all services.
    fn find_edx<'a>(&'a self, name: &'a str) -> ClientFuture<'a, Vec<TaskInfo>>;
}
