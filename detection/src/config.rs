//! Detection settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "VIT23n_quantmodel.onnx";
pub const DEFAULT_CATALOG_PATH: &str = "skindisease.json";
pub const DEFAULT_INPUT_NAME: &str = "input_1";
pub const DEFAULT_OUTPUT_NAME: &str = "dense";
pub const DEFAULT_REMOTE_URL: &str = "https://skindiseasesdetect-2.onrender.com/detect";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Where the model, catalog and remote fallback live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// ONNX classifier artifact
    pub model_path: PathBuf,
    /// Name of the model's single input tensor
    pub input_name: String,
    /// Name of the model's class-activation output
    pub output_name: String,
    /// Condition catalog, ordered like the classifier's classes
    pub catalog_path: PathBuf,
    /// Remote detection endpoint; `None` disables the fallback
    pub remote_url: Option<String>,
    pub remote_timeout_secs: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            remote_url: Some(DEFAULT_REMOTE_URL.to_string()),
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}
