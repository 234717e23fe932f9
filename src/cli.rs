// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Args, Parser, Subcommand};

use crate::types::Verbosity;

/// Command-line arguments for `edxrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "edxrun",
    version,
    about = "Trigger an EDX task and wait for it and every task it triggers.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// A missing file is not an error; built-in defaults are used instead.
    #[arg(long, value_name = "PATH", default_value = "Edxrun.toml", global = true)]
    pub config: String,

    /// Management service URL, overriding `[server].url` from the config file.
    #[arg(long, value_name = "URL", global = true)]
    pub server: Option<String>,

    /// Output level, 0-4. 0 produces no output and 4 is the most verbose.
    ///
    /// If omitted, the config file, `EDXRUN_LOG` or the default (4) is used.
    #[arg(long, short = 'v', value_name = "LEVEL", global = true)]
    pub verbosity: Option<Verbosity>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Trigger a single EDX task and wait for the result(s).
    Run(RunArgs),

    /// List all EDX tasks on every distribution service.
    List,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// The name or id of the task to execute.
    #[arg(long, value_name = "NAME|ID")]
    pub task: String,

    /// The password required to execute the task, if set.
    #[arg(long, visible_alias = "pwd", default_value = "")]
    pub password: String,

    /// The name of the variable to pass on to the task.
    #[arg(long, visible_alias = "vn", value_name = "NAME", default_value = "")]
    pub variable_name: String,

    /// A semicolon separated list of values for the variable.
    #[arg(long, visible_alias = "vv", value_name = "VALUES")]
    pub variable_values: Option<String>,

    /// How many seconds to wait for a single task to finish.
    ///
    /// Falls back to `[poll].timeout_secs`, then 3600.
    #[arg(long, visible_alias = "to", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// How often, in seconds, to check the status of a task.
    ///
    /// Falls back to `[poll].interval_secs`, then 5.
    #[arg(long, visible_alias = "pi", value_name = "SECONDS")]
    pub poll_interval: Option<u64>,

    /// How many seconds to delay before the program terminates.
    #[arg(long, value_name = "SECONDS", default_value_t = 0)]
    pub delay: u64,

    /// Don't wait for task completion.
    #[arg(long, visible_alias = "nw")]
    pub no_wait: bool,
}

impl RunArgs {
    /// Split `--variable-values` on `;`, dropping empty entries.
    pub fn variable_values(&self) -> Vec<String> {
        split_variable_values(self.variable_values.as_deref().unwrap_or_default())
    }
}

pub fn split_variable_values(raw: &str) -> Vec<String> {
    raw.split(';')
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
