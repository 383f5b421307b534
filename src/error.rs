//! Error types for playlist analysis

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Error types for analyzer operations
///
/// Only `InvalidInput` and `Network` ever reach a caller as a failure. Upstream
/// irregularities are absorbed by the aggregator and reported as
/// [`Degradation`](crate::playlist::Degradation) values instead.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzerError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Network(String),
}

impl AnalyzerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether this error should be shown to the user as a bad-input message
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
