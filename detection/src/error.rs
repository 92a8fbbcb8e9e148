//! Error types for the detection pipeline.
//!
//! Only [`DetectionError`] ever reaches the caller of
//! [`DetectionCoordinator::detect`](crate::DetectionCoordinator::detect).
//! [`InferenceError`] and [`RemoteServiceError`] are absorbed by the
//! coordinator into the degraded sentinel result.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectionError>;

/// Faults that stop a detection request.
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The uploaded bytes are not a decodable image (client-input fault).
    #[error("Invalid image file: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The catalog could not be loaded (deployment fault).
    #[error("Catalog load error: {0}")]
    Catalog(#[from] CatalogError),

    /// The classifier produced a class index the catalog does not have.
    #[error("Class index {index} out of range for catalog of {len} conditions")]
    IndexOutOfRange { index: usize, len: usize },
}

impl DetectionError {
    /// True when the request itself was bad rather than the deployment.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, DetectionError::ImageDecode(_))
    }
}

/// Catalog data missing or malformed.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Catalog contains no conditions")]
    Empty,

    #[error("Catalog record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Local classifier failures.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// The model artifact is absent or failed to load. A state, not a fault.
    #[error("Local model unavailable")]
    ModelUnavailable,

    #[error("ONNX session error: {0}")]
    Session(#[from] derma_onnx_loader::OnnxError),

    #[error("Model produced no class activations")]
    EmptyOutput,
}

/// Remote fallback failures. Never retried.
#[derive(Error, Debug)]
pub enum RemoteServiceError {
    #[error("Remote detection timed out")]
    Timeout,

    #[error("Failed to connect to remote detection service: {0}")]
    Connection(String),

    #[error("Remote detection returned status {0}")]
    Status(u16),

    #[error("Malformed remote detection payload: {0}")]
    MalformedResponse(String),

    #[error("Failed to encode image for upload: {0}")]
    Encode(String),

    #[error("Remote request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for RemoteServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteServiceError::Timeout
        } else if e.is_connect() {
            RemoteServiceError::Connection(e.to_string())
        } else if let Some(status) = e.status() {
            RemoteServiceError::Status(status.as_u16())
        } else {
            RemoteServiceError::Request(e.to_string())
        }
    }
}
