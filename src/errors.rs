// src/errors.rs

//! Crate-wide error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdxError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Service key handshake failed: {0}")]
    Handshake(String),

    #[error("Server returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Invalid response from server: {0}")]
    Decode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for EdxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EdxError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            EdxError::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            EdxError::Transport(err.to_string())
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, EdxError>;
