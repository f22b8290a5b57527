//! Error types for causal-explore

use thiserror::Error;

/// Result type alias for causal-explore operations
pub type Result<T> = std::result::Result<T, ExploreError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Row storage error: {0}")]
    StorageError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Service responded with {status}: {status_text}")]
    ServiceStatus { status: u16, status_text: String },

    #[error("Service rejected request: {0}")]
    ServiceRejected(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl From<polars::error::PolarsError> for ExploreError {
    fn from(err: polars::error::PolarsError) -> Self {
        ExploreError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ExploreError {
    fn from(err: serde_json::Error) -> Self {
        ExploreError::SerializationError(err.to_string())
    }
}
