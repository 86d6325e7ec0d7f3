//! Custom error types for sealcfg
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for sealcfg operations
#[derive(Error, Debug)]
pub enum SealError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for keys and values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entry not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The cipher or key derivation failed while sealing a value
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Any failure to open an envelope (bad encoding, short input, wrong
    /// password, tampering)
    #[error("Decryption failed: wrong password or corrupted value")]
    Decryption,

    /// A local check failed before any crypto or store call was made
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The config store rejected the request or could not be reached
    #[error("Store error{}: {message}", status_suffix(.status))]
    Store {
        status: Option<u16>,
        message: String,
    },

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SealError {
    /// Create a "not found" error for config entries
    pub fn entry_not_found(key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Config entry",
            identifier: key.into(),
        }
    }

    /// Create a store error without an HTTP status
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            status: None,
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a decryption failure
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption)
    }

    /// Check if this is a precondition failure
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SealError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for SealError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Store {
                status: Some(status.as_u16()),
                message: err.to_string(),
            },
            None => Self::store(err.to_string()),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Result type alias for sealcfg operations
pub type SealResult<T> = Result<T, SealError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SealError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = SealError::entry_not_found("api_token");
        assert_eq!(err.to_string(), "Config entry not found: api_token");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_decryption_error_does_not_leak_cause() {
        let err = SealError::Decryption;
        assert_eq!(
            err.to_string(),
            "Decryption failed: wrong password or corrupted value"
        );
        assert!(err.is_decryption());
    }

    #[test]
    fn test_store_error_display() {
        let err = SealError::Store {
            status: Some(400),
            message: "key must not be empty".into(),
        };
        assert_eq!(err.to_string(), "Store error (HTTP 400): key must not be empty");

        let err = SealError::store("connection refused");
        assert_eq!(err.to_string(), "Store error: connection refused");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let seal_err: SealError = io_err.into();
        assert!(matches!(seal_err, SealError::Io(_)));
    }
}
