//! Analysis service trait and its error type.

use super::upload::DocumentUpload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a call to the external analysis service.
///
/// The variants separate "no response" from "a response with a non-success
/// status" from "the client itself failed", because each call site words
/// those cases differently for the user.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceError {
    /// The request was sent but no response came back (connection refused, reset, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// The call did not settle within the configured timeout.
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Any other failure: request construction, body decoding, or an
    /// error reported inside an otherwise successful response.
    #[error("{0}")]
    Client(String),
}

impl ServiceError {
    /// Returns true when no response was received at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Contract of the external analysis backend.
///
/// Responses are treated as untyped at this boundary: trend results come back
/// as raw JSON values and are validated by [`crate::report::ReportIngestor`]
/// before any field is trusted.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Sends a (possibly context-augmented) question and returns the assistant text.
    async fn ask(&self, message: &str) -> Result<String, ServiceError>;

    /// Uploads one document and returns its free-text analysis.
    async fn analyze_report(&self, upload: &DocumentUpload) -> Result<String, ServiceError>;

    /// Uploads several documents and returns one raw analysis result per document.
    ///
    /// A response of the form `{ "error": "..." }` must be reported as
    /// [`ServiceError::Client`] rather than returned as data.
    async fn analyze_trends(
        &self,
        uploads: &[DocumentUpload],
    ) -> Result<Vec<serde_json::Value>, ServiceError>;
}
