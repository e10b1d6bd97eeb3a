//! Error types for SCHOA
//!
//! Typed failures used inside the library. The model gateway collapses
//! these into display text at its boundary; everything else propagates
//! them with `?`.

use thiserror::Error;

/// Main error type for the SCHOA library
#[derive(Error, Debug)]
pub enum SchoaError {
    /// HTTP client errors (connection refused, DNS, TLS, body read)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Credential rejected by the model service
    #[error("Model service rejected credential (HTTP {status}): {message}")]
    AuthError { status: u16, message: String },

    /// Any other non-success status from the model service
    #[error("Model service error (HTTP {status}): {message}")]
    ServiceError { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Failed to decode model response: {0}")]
    DecodeError(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Image loading or encoding errors
    #[error("Image error: {0}")]
    ImageError(String),

    /// In-flight call was cancelled before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// View action rejected (empty input, busy view)
    #[error("Action rejected: {0}")]
    Rejected(String),
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, SchoaError>;

impl SchoaError {
    /// True for credential failures
    pub fn is_auth(&self) -> bool {
        matches!(self, SchoaError::AuthError { .. })
    }

    /// True for failures that never reached the service or could not be read back
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SchoaError::HttpError(_) | SchoaError::DecodeError(_) | SchoaError::IoError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchoaError::ServiceError {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_auth_classification() {
        let err = SchoaError::AuthError {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert!(err.is_auth());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_classification() {
        let err = SchoaError::DecodeError("expected value".to_string());
        assert!(err.is_transport());
        assert!(!err.is_auth());
    }
}
