//! Front-end error types and exit codes.

use derma_detection::{CatalogError, DetectionError};
use std::path::PathBuf;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Upload is not a PNG or JPEG by name.
    #[error("Unsupported file type: {0:?}. Please upload PNG, JPG, or JPEG images.")]
    UnsupportedFileType(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Detection failed: {0}")]
    Detection(#[from] DetectionError),

    #[error("Startup failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for bad input from the caller, 1 for everything on our side.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::UnsupportedFileType(_) => 2,
            CliError::Detection(e) if e.is_client_fault() => 2,
            _ => 1,
        }
    }
}
