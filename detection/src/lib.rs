//! Skin-condition detection pipeline
//!
//! Composes:
//! - `derma-onnx-loader` (local ONNX inference)
//! - a hosted HTTP service (remote fallback)
//! - the condition catalog (class index to metadata)
//!
//! # Example
//!
//! ```no_run
//! use derma_detection::{DetectionConfig, DetectionCoordinator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = DetectionCoordinator::from_config(&DetectionConfig::default())?;
//! let bytes = std::fs::read("lesion.jpg")?;
//! let result = coordinator.detect(&bytes)?;
//! println!("{} ({:.2})", result.disease(), result.probability());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod preprocess;
pub mod remote;

pub use catalog::DiseaseCatalog;
pub use config::DetectionConfig;
pub use coordinator::{DegradeReason, DetectionCoordinator};
pub use engine::{select_class, Classifier, LocalInferenceEngine};
pub use error::{CatalogError, DetectionError, InferenceError, RemoteServiceError, Result};
pub use preprocess::{ImagePreprocessor, MODEL_INPUT_SIZE};
pub use remote::{RemoteDetection, RemoteDetector, RemoteInferenceClient};
