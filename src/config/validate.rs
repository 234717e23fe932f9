// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{EdxError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::EdxError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.server, raw.poll, raw.verbosity))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_server(cfg)?;
    validate_poll(cfg)?;
    Ok(())
}

fn validate_server(cfg: &RawConfigFile) -> Result<()> {
    let url = cfg.server.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(EdxError::ConfigError(format!(
            "[server].url must be an http(s) URL (got '{}')",
            cfg.server.url
        )));
    }

    if cfg.server.request_timeout_secs == 0 {
        return Err(EdxError::ConfigError(
            "[server].request_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_poll(cfg: &RawConfigFile) -> Result<()> {
    // The wait budget divides by the interval.
    if cfg.poll.interval_secs == 0 {
        return Err(EdxError::ConfigError(
            "[poll].interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.poll.timeout_secs == 0 {
        return Err(EdxError::ConfigError(
            "[poll].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
