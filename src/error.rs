//! Error types for the Shuttergate service.

use thiserror::Error;

/// Main error type for Shuttergate operations.
#[derive(Error, Debug)]
pub enum ShuttergateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (listener bind, server runtime, config file reads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Shuttergate operations.
pub type Result<T> = std::result::Result<T, ShuttergateError>;
