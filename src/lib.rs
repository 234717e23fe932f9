// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod list;
pub mod logging;
pub mod monitor;
pub mod types;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::cli::{CliArgs, Command, RunArgs};
use crate::client::{HttpTaskClient, TriggerRequest};
use crate::config::{ConfigFile, RawConfigFile, load_or_default};
use crate::monitor::{RunOptions, trigger_and_monitor};

/// Load the config file (if any) and fold the CLI overrides into it.
///
/// Precedence: command line, then config file, then built-in defaults.
pub fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = load_or_default(Path::new(&args.config))?;
    apply_overrides(&mut raw, args);
    Ok(ConfigFile::try_from(raw)?)
}

fn apply_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(ref url) = args.server {
        raw.server.url = url.clone();
    }
    if let Command::Run(ref run) = args.command {
        if let Some(secs) = run.poll_interval {
            raw.poll.interval_secs = secs;
        }
        if let Some(secs) = run.timeout {
            raw.poll.timeout_secs = secs;
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// Returns the verdict: `true` maps to exit code 0, `false` to 1.
pub async fn run(args: CliArgs, config: ConfigFile) -> Result<bool> {
    match args.command {
        Command::Run(ref run) => Ok(run_task(run, &config).await),
        Command::List => {
            let client = HttpTaskClient::connect(&config).await?;
            Ok(list::run_list(&client).await)
        }
    }
}

async fn run_task(args: &RunArgs, config: &ConfigFile) -> bool {
    let request = TriggerRequest {
        task: args.task.clone(),
        password: args.password.clone(),
        variable_name: args.variable_name.clone(),
        variable_values: args.variable_values(),
    };
    let options = RunOptions {
        no_wait: args.no_wait,
        post_run_delay: Duration::from_secs(args.delay),
    };
    let poll = config.poll_config();
    debug!(?poll, ?options, task = %request.task, "starting run");

    let report = trigger_and_monitor(
        HttpTaskClient::connect(config),
        &request,
        poll,
        options,
    )
    .await;

    debug!(outcome = ?report.outcome, success = report.success, "run finished");
    report.success
}
