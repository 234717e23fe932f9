use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use edxrun::client::{
    ClientFuture, ExecutionId, RemoteTaskClient, ServiceInfo, TaskCatalog, TaskInfo, TaskStatus,
    TriggerOutcome, TriggerRequest,
};
use edxrun::errors::EdxError;
use tokio::time::Instant;
use uuid::Uuid;

/// One canned answer to a status call.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(TaskStatus),
    Fail(String),
}

/// A call the client received, with the (possibly paused) tokio time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Trigger(TriggerRequest),
    Status(ExecutionId, Instant),
}

/// A fake client that:
/// - answers `trigger` with a fixed outcome (or a transport error)
/// - answers `status` from a per-execution script; the last reply of a
///   script repeats forever
/// - records every call it receives.
#[derive(Debug)]
pub struct ScriptedClient {
    trigger: std::result::Result<TriggerOutcome, String>,
    scripts: Mutex<HashMap<ExecutionId, VecDeque<Reply>>>,
    services: Vec<(ServiceInfo, Vec<TaskInfo>)>,
    edx: Vec<TaskInfo>,
    catalog_error: Option<String>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedClient {
    pub fn new(trigger: TriggerOutcome) -> Self {
        Self {
            trigger: Ok(trigger),
            scripts: Mutex::new(HashMap::new()),
            services: Vec::new(),
            edx: Vec::new(),
            catalog_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client whose trigger call fails at the transport level.
    pub fn failing_trigger(message: &str) -> Self {
        let mut client = Self::new(TriggerOutcome::rejected("unused"));
        client.trigger = Err(message.to_string());
        client
    }

    /// Script the replies for one execution.
    pub fn script(self, exec_id: ExecutionId, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(exec_id, replies.into_iter().collect());
        self
    }

    /// Script a single reply that repeats forever.
    pub fn always(self, status: TaskStatus) -> Self {
        let exec_id = status.exec_id;
        self.script(exec_id, vec![Reply::Status(status)])
    }

    /// Script a sequence of statuses; the last one repeats.
    pub fn sequence(self, statuses: Vec<TaskStatus>) -> Self {
        let exec_id = statuses
            .first()
            .map(|s| s.exec_id)
            .expect("sequence needs at least one status");
        self.script(exec_id, statuses.into_iter().map(Reply::Status).collect())
    }

    pub fn with_service(mut self, service: ServiceInfo, tasks: Vec<TaskInfo>) -> Self {
        self.services.push((service, tasks));
        self
    }

    pub fn with_edx(mut self, task: TaskInfo) -> Self {
        self.edx.push(task);
        self
    }

    pub fn with_catalog_error(mut self, message: &str) -> Self {
        self.catalog_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn trigger_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Trigger(_)))
            .count()
    }

    /// Times of every status call for `exec_id`, in order.
    pub fn status_calls_for(&self, exec_id: ExecutionId) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Status(id, at) if id == exec_id => Some(at),
                _ => None,
            })
            .collect()
    }

    /// Execution IDs of every status call, in order.
    pub fn polled(&self) -> Vec<ExecutionId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Status(id, _) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn next_reply(&self, exec_id: ExecutionId) -> Option<Reply> {
        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts.get_mut(&exec_id)?;
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }

    fn catalog<T>(&self, value: T) -> edxrun::errors::Result<T> {
        match self.catalog_error {
            Some(ref message) => Err(EdxError::Remote {
                status: 403,
                message: message.clone(),
            }),
            None => Ok(value),
        }
    }
}

impl RemoteTaskClient for ScriptedClient {
    fn trigger<'a>(&'a self, request: &'a TriggerRequest) -> ClientFuture<'a, TriggerOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Trigger(request.clone()));
        let reply = self
            .trigger
            .clone()
            .map_err(EdxError::Transport);
        Box::pin(async move { reply })
    }

    fn status(&self, exec_id: ExecutionId) -> ClientFuture<'_, TaskStatus> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Status(exec_id, Instant::now()));
        let reply = match self.next_reply(exec_id) {
            Some(Reply::Status(status)) => Ok(status),
            Some(Reply::Fail(message)) => Err(EdxError::Transport(message)),
            None => Err(EdxError::Transport(format!("no script for {exec_id}"))),
        };
        Box::pin(async move { reply })
    }
}

impl TaskCatalog for ScriptedClient {
    fn services(&self) -> ClientFuture<'_, Vec<ServiceInfo>> {
        let reply = self.catalog(self.services.iter().map(|(s, _)| s.clone()).collect());
        Box::pin(async move { reply })
    }

    fn tasks(&self, service_id: Uuid) -> ClientFuture<'_, Vec<TaskInfo>> {
        let tasks = self
            .services
            .iter()
            .find(|(s, _)| s.id == service_id)
            .map(|(_, tasks)| tasks.clone())
            .unwrap_or_default();
        let reply = self.catalog(tasks);
        Box::pin(async move { reply })
    }

    fn find_edx<'a>(&'a self, name: &'a str) -> ClientFuture<'a, Vec<TaskInfo>> {
        let found = self.edx.iter().filter(|t| t.name == name).cloned().collect();
        let reply = self.catalog(found);
        Box::pin(async move { reply })
    }
}
