//! Error types for ocean engine startup.
//!
//! Every failure happens during `initialize`; once the engine is running,
//! evolving and transforming fixed-size buffers cannot fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OceanError {
    /// Rejected parameters (grid size, wind, gravity, scale)
    #[error("invalid ocean configuration: {0}")]
    Configuration(String),

    /// Could not allocate a transform buffer
    #[error("failed to allocate {what} ({bytes} bytes)")]
    ResourceExhaustion { what: &'static str, bytes: usize },
}

impl OceanError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, OceanError>;
