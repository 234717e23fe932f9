// src/types.rs

use std::str::FromStr;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;

/// Output verbosity, `0` (nothing) through `4` (everything).
///
/// The numeric form is what operators pass on the command line; each level
/// maps onto a `tracing` max-level filter:
///
/// | value | level     | tracing |
/// |-------|-----------|---------|
/// | 0     | `Off`     | off     |
/// | 1     | `Error`   | ERROR   |
/// | 2     | `Warning` | WARN    |
/// | 3     | `Info`    | INFO    |
/// | 4     | `Verbose` | DEBUG   |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "u8")]
pub enum Verbosity {
    Off,
    Error,
    Warning,
    Info,
    #[default]
    Verbose,
}

impl Verbosity {
    /// Numeric levels above 4 clamp to `Verbose`.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Off,
            1 => Verbosity::Error,
            2 => Verbosity::Warning,
            3 => Verbosity::Info,
            _ => Verbosity::Verbose,
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Off => LevelFilter::OFF,
            Verbosity::Error => LevelFilter::ERROR,
            Verbosity::Warning => LevelFilter::WARN,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Verbose => LevelFilter::DEBUG,
        }
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, String> {
        Ok(Verbosity::from_level(level))
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(level) = s.parse::<u8>() {
            return Ok(Verbosity::from_level(level));
        }
        match s.as_str() {
            "off" => Ok(Verbosity::Off),
            "error" => Ok(Verbosity::Error),
            "warn" | "warning" => Ok(Verbosity::Warning),
            "info" => Ok(Verbosity::Info),
            "verbose" | "debug" => Ok(Verbosity::Verbose),
            other => Err(format!(
                "invalid verbosity: {other} (expected 0-4 or off/error/warn/info/verbose)"
            )),
        }
    }
}
