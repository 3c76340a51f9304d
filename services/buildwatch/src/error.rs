//! Error types for the buildwatch service

/// Errors that can occur in the buildwatch service
#[derive(Debug, thiserror::Error)]
pub enum BuildwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

/// Result type alias for buildwatch operations
pub type Result<T> = std::result::Result<T, BuildwatchError>;
