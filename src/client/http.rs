// src/client/http.rs

//! JSON-over-HTTP transport to the management service.
//!
//! Connecting performs a handshake that exchanges nothing but a short-lived
//! service key; every later request carries it in the `X-Service-Key`
//! header.

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::client::{
    ClientFuture, ExecutionId, RemoteTaskClient, ServiceInfo, TaskCatalog, TaskInfo, TaskStatus,
    TriggerOutcome, TriggerRequest,
};
use crate::config::ConfigFile;
use crate::errors::{EdxError, Result};

/// Header carrying the time-limited service key.
pub const SERVICE_KEY_HEADER: &str = "X-Service-Key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriggerBody<'a> {
    service_id: Uuid,
    task_name_or_id: &'a str,
    password: &'a str,
    variable_name: &'a str,
    variable_values: &'a [String],
}

/// Production [`RemoteTaskClient`] / [`TaskCatalog`].
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
    http: Client,
    base_url: String,
    service_key: String,
    service_id: Uuid,
}

impl HttpTaskClient {
    /// Build the HTTP client and fetch a service key.
    pub async fn connect(config: &ConfigFile) -> Result<Self> {
        let base_url = config.server.url.trim().trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        debug!(url = %base_url, "requesting service key");
        let resp = http
            .get(format!("{base_url}/servicekey"))
            .send()
            .await
            .map_err(|e| EdxError::Handshake(e.to_string()))?;
        let service_key: String = decode(resp)
            .await
            .map_err(|e| EdxError::Handshake(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            service_key,
            service_id: config.server.service_id,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(SERVICE_KEY_HEADER, &self.service_key)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: impl reqwest::IntoUrl) -> Result<T> {
        let resp = self.authorized(self.http.get(url)).send().await?;
        decode(resp).await
    }
}

/// Turn a non-2xx answer into [`EdxError::Remote`], otherwise decode JSON.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(EdxError::Remote {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.json::<T>().await?)
}

impl RemoteTaskClient for HttpTaskClient {
    fn trigger<'a>(&'a self, request: &'a TriggerRequest) -> ClientFuture<'a, TriggerOutcome> {
        Box::pin(async move {
            let body = TriggerBody {
                service_id: self.service_id,
                task_name_or_id: &request.task,
                password: &request.password,
                variable_name: &request.variable_name,
                variable_values: &request.variable_values,
            };
            let resp = self
                .authorized(self.http.post(self.endpoint("edx/trigger")))
                .json(&body)
                .send()
                .await?;
            decode(resp).await
        })
    }

    fn status(&self, exec_id: ExecutionId) -> ClientFuture<'_, TaskStatus> {
        Box::pin(async move {
            let url = self.endpoint(&format!("edx/status/{}/{}", self.service_id, exec_id));
            self.get_json(url).await
        })
    }
}

impl TaskCatalog for HttpTaskClient {
    fn services(&self) -> ClientFuture<'_, Vec<ServiceInfo>> {
        Box::pin(async move {
            self.get_json(self.endpoint("services?type=distribution"))
                .await
        })
    }

    fn tasks(&self, service_id: Uuid) -> ClientFuture<'_, Vec<TaskInfo>> {
        Box::pin(async move {
            self.get_json(self.endpoint(&format!("services/{service_id}/tasks")))
                .await
        })
    }

    fn find_edx<'a>(&'a self, name: &'a str) -> ClientFuture<'a, Vec<TaskInfo>> {
        Box::pin(async move {
            let url = Url::parse_with_params(&self.endpoint("edx/find"), &[("name", name)])
                .map_err(|e| EdxError::Transport(format!("building find url: {e}")))?;
            self.get_json(url).await
        })
    }
}
