// src/logging.rs

//! Logging setup for `edxrun` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the verbosity:
//! 1. `--verbosity` CLI flag (if provided)
//! 2. `verbosity` in the config file (if provided)
//! 3. `EDXRUN_LOG` environment variable (`0`-`4` or a level name)
//! 4. default to `Verbose` (4)
//!
//! Logs are sent to STDERR so that stdout stays free for the task listing.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::types::Verbosity;

/// Environment variable consulted when no explicit verbosity is given.
pub const LOG_ENV_VAR: &str = "EDXRUN_LOG";

/// Resolve the effective verbosity from the explicit sources and the
/// environment.
pub fn resolve_verbosity(cli: Option<Verbosity>, file: Option<Verbosity>) -> Verbosity {
    cli.or(file)
        .or_else(|| {
            std::env::var(LOG_ENV_VAR)
                .ok()
                .and_then(|s| s.parse::<Verbosity>().ok())
        })
        .unwrap_or_default()
}

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(verbosity: Verbosity) -> Result<()> {
    fmt()
        .with_max_level(verbosity.level_filter())
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}
