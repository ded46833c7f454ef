//! Error types for the simulation core.
//!
//! Both kinds of failure are fatal: a configuration fault aborts startup and
//! an invalid state code points at a bug on the caller's side. Nothing here
//! is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Required bodies or joints are missing, or tuning values are out of range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A state code outside the defined enumeration.
    #[error("invalid game state code: {0}")]
    InvalidState(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn config(msg: impl Into<String>) -> Self {
        SimError::Configuration(msg.into())
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
