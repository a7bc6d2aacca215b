//! services/app/src/error.rs
//!
//! Defines the primary error type for the application.

use crate::config::ConfigError;
use storyteller_core::ports::PortError;

/// The primary error type for the `app` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents a failure while building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading commands from stdin).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
