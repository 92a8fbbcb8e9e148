//! ONNX Runtime inference loader
//!
//! Provides a high-level wrapper around the ort crate with:
//! - Execution provider selection (CPU, CUDA when the `cuda` feature is on)
//! - Sensible session defaults (Level3 optimization, 4/2 threads)
//! - Single-input / single-output f32 inference for image classifiers

pub mod error;
pub mod providers;
pub mod session;

pub use error::{OnnxError, Result};
pub use providers::{auto_select_providers, ExecutionTarget};
pub use session::OnnxSession;
