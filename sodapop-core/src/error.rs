//! Error types for sodapop.

use thiserror::Error;

/// Errors that can occur in sodapop operations.
#[derive(Error, Debug)]
pub enum SodapopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required Firebase configuration keys: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("No signed-in session")]
    Unauthenticated,

    #[error("{0} is not implemented")]
    NotImplemented(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sodapop operations.
pub type SodapopResult<T> = Result<T, SodapopError>;
