// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use crate::monitor::PollConfig;
use crate::types::Verbosity;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// verbosity = 3
///
/// [server]
/// url = "http://qms.example.local:4799/QMS/Service"
/// request_timeout_secs = 30
/// service_id = "00000000-0000-0000-0000-000000000000"
///
/// [poll]
/// interval_secs = 5
/// timeout_secs = 3600
/// ```
///
/// All sections are optional and have the same defaults as the CLI.
/// This is the unvalidated form; see [`ConfigFile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub poll: PollSection,

    /// Output verbosity, `0`-`4`.
    #[serde(default)]
    pub verbosity: Option<Verbosity>,
}

/// `[server]` section: where the management service lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Base URL of the management service.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout for every HTTP call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Distribution service the task lives on. The nil UUID lets the
    /// server pick.
    #[serde(default)]
    pub service_id: Uuid,
}

fn default_url() -> String {
    "http://localhost:4799/QMS/Service".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_secs: default_request_timeout_secs(),
            service_id: Uuid::nil(),
        }
    }
}

/// `[poll]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PollSection {
    /// Seconds between two status checks of a waiting task.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Seconds to wait for a single task to finish.
    ///
    /// Applied afresh to the root task and to every triggered task.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    3600
}

impl Default for PollSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)`, which runs
/// the checks in [`crate::config::validate`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub poll: PollSection,
    pub verbosity: Option<Verbosity>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        server: ServerSection,
        poll: PollSection,
        verbosity: Option<Verbosity>,
    ) -> Self {
        Self {
            server,
            poll,
            verbosity,
        }
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            poll_interval: Duration::from_secs(self.poll.interval_secs),
            timeout: Duration::from_secs(self.poll.timeout_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}
