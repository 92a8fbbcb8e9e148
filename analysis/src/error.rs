//! Text-generation service failures.
//!
//! None of these reach the caller: the generator turns every one of them
//! into canned or recovered text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisServiceError {
    #[error("Analysis service request timed out")]
    Timeout,

    #[error("Failed to connect to analysis service: {0}")]
    Connection(String),

    #[error("Analysis service returned status {0}")]
    Status(u16),

    #[error("Malformed analysis service response: {0}")]
    MalformedResponse(String),

    #[error("Analysis request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for AnalysisServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalysisServiceError::Timeout
        } else if e.is_connect() {
            AnalysisServiceError::Connection(e.to_string())
        } else if let Some(status) = e.status() {
            AnalysisServiceError::Status(status.as_u16())
        } else if e.is_decode() {
            AnalysisServiceError::MalformedResponse(e.to_string())
        } else {
            AnalysisServiceError::Request(e.to_string())
        }
    }
}
