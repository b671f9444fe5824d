//! Error types for the PIE pun identification engine
//!
//! This module provides comprehensive error handling using thiserror for
//! structured error definitions and anyhow for error propagation.

use thiserror::Error;

/// Main error type for PIE operations
#[derive(Error, Debug)]
pub enum PieError {
    /// Caller supplied an empty or malformed sentence
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The reasoning oracle could not be reached (network, auth, rate limit)
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// The oracle responded but the payload did not match the expected shape
    #[error("Oracle returned malformed response: {0}")]
    OracleMalformedResponse(String),

    /// The lexical-frame resource is missing or unreadable
    #[error("Frame resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl PieError {
    /// Whether the engine should retry the operation that produced this error.
    ///
    /// Only transient oracle failures are retryable; schema violations and
    /// caller errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PieError::OracleUnavailable(_))
    }
}

/// Result type alias for PIE operations
pub type Result<T> = std::result::Result<T, PieError>;

/// Convert anyhow::Error to PieError
impl From<anyhow::Error> for PieError {
    fn from(err: anyhow::Error) -> Self {
        PieError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PieError::InvalidInput("sentence is empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: sentence is empty");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(PieError::OracleUnavailable("timeout".into()).is_retryable());
        assert!(!PieError::OracleMalformedResponse("bad json".into()).is_retryable());
        assert!(!PieError::InvalidInput("empty".into()).is_retryable());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: PieError = anyhow::anyhow!("something went sideways").into();
        assert!(matches!(err, PieError::Other(_)));
    }
}
