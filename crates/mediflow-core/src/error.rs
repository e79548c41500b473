//! Error types for the MediFlow engine.

use crate::analysis::ServiceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the MediFlow engine.
///
/// Report ingestion has its own [`crate::report::IngestError`] because those
/// failures are recovered locally and never surface to callers.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediflowError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request is already in flight for this session.
    #[error("Session is busy: a request is already outstanding")]
    Busy,

    /// External analysis service failure
    #[error("Analysis service error: {0}")]
    Service(#[from] ServiceError),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediflowError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a JSON serialization error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this error came from the external analysis service
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MediflowError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MediflowError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

impl From<toml::de::Error> for MediflowError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error for application-edge helpers
impl From<anyhow::Error> for MediflowError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, MediflowError>`.
pub type Result<T> = std::result::Result<T, MediflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: MediflowError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        match err {
            MediflowError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let err: MediflowError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_service_error_conversion() {
        let err: MediflowError = ServiceError::Network("refused".into()).into();
        assert!(err.is_service());
        assert!(!err.is_not_found());
    }
}
