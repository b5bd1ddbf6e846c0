//! Error types for deploydiag

use thiserror::Error;

/// Main error type for deploydiag
///
/// Only the I/O-facing collaborators (files, probes, report storage) return
/// this. The analysis functions degrade individual fields instead.
#[derive(Error, Debug)]
pub enum DiagError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Probe error: {0}")]
    ProbeError(String),

    #[error("TLS error: {0}")]
    TlsError(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for DiagError {
    fn from(err: anyhow::Error) -> Self {
        DiagError::Internal(err.to_string())
    }
}
