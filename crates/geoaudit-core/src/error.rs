//! Error types for page analysis and completion calls

use serde::Serialize;
use thiserror::Error;

/// Failure of a whole analysis run. A failed run never yields a partial report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: server responded with status {status}")]
    HttpStatus { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Failure of a single call to the completion service.
///
/// These never escape the fix suggester or the GEO scorer; both map them onto
/// fallback values.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion API credentials are not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

/// The `{"error": "..."}` substitute returned in place of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&AnalysisError> for ErrorReport {
    fn from(err: &AnalysisError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_report_carries_message() {
        let err = AnalysisError::HttpStatus { status: 404 };
        let report = ErrorReport::from(&err);
        assert_eq!(
            report.error,
            "HTTP error: server responded with status 404"
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json, serde_json::json!({"error": report.error}));
    }

    #[test]
    fn timeout_message_mentions_seconds() {
        let err = AnalysisError::Timeout(15);
        assert!(err.to_string().contains("15 seconds"));
    }
}
