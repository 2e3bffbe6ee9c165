//! Error types for the scam interceptor

use thiserror::Error;

/// Result type alias for interceptor operations
pub type Result<T> = std::result::Result<T, InterceptorError>;

#[derive(Error, Debug)]
pub enum InterceptorError {

    // =============================
    // Structural Faults (fatal at startup)
    // =============================

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // Per-request Faults
    // =============================

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Pipeline error: {0}")]
    PipelineError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
