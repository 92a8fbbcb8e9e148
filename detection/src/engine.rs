//! Local classifier.
//!
//! The ONNX session is created at most once per engine, on first demand,
//! under `OnceCell::get_or_init`. A failed load is remembered: the engine
//! then reports itself unavailable for the rest of the process lifetime and
//! the coordinator routes every request to the remote fallback.

use crate::config::DetectionConfig;
use crate::error::InferenceError;
use derma_onnx_loader::OnnxSession;
use ndarray::Array4;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

/// Anything that can turn a preprocessed tensor into a class index.
pub trait Classifier: Send + Sync {
    /// Whether inference can run at all. May trigger one-time initialization.
    fn available(&self) -> bool;

    /// Forward pass; returns the winning class index and its raw activation.
    fn infer(&self, tensor: &Array4<f32>) -> Result<(usize, f32), InferenceError>;
}

/// ONNX-backed classifier with lazily created session.
pub struct LocalInferenceEngine {
    model_path: PathBuf,
    input_name: String,
    output_name: String,
    session: OnceCell<Option<OnnxSession>>,
}

impl LocalInferenceEngine {
    pub fn new(
        model_path: impl Into<PathBuf>,
        input_name: impl Into<String>,
        output_name: impl Into<String>,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            input_name: input_name.into(),
            output_name: output_name.into(),
            session: OnceCell::new(),
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(
            config.model_path.clone(),
            config.input_name.clone(),
            config.output_name.clone(),
        )
    }

    fn session(&self) -> Option<&OnnxSession> {
        self.session
            .get_or_init(|| match OnnxSession::load(&self.model_path) {
                Ok(session) => {
                    tracing::info!(path = ?self.model_path, "Local classifier loaded");
                    Some(session)
                }
                Err(e) => {
                    tracing::warn!(
                        path = ?self.model_path,
                        error = %e,
                        "Local classifier unavailable, remote fallback will be used"
                    );
                    None
                }
            })
            .as_ref()
    }
}

impl Classifier for LocalInferenceEngine {
    fn available(&self) -> bool {
        self.session().is_some()
    }

    fn infer(&self, tensor: &Array4<f32>) -> Result<(usize, f32), InferenceError> {
        let session = self.session().ok_or(InferenceError::ModelUnavailable)?;

        let (shape, activations) =
            session.run_f32(&self.input_name, tensor.clone(), &self.output_name)?;

        // First row of the batch holds this image's activations.
        let classes = match shape.last() {
            Some(&n) if n > 0 => n as usize,
            _ => activations.len(),
        };
        let first_row = &activations[..classes.min(activations.len())];

        let (index, confidence) = select_class(first_row).ok_or(InferenceError::EmptyOutput)?;
        tracing::debug!(index, confidence, classes, "Local inference complete");
        Ok((index, confidence))
    }
}

/// Index and raw value of the maximal activation; first index wins ties.
///
/// No softmax is applied, so the value can fall outside `[0, 1]`.
pub fn select_class(activations: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in activations.iter().enumerate() {
        match best {
            Some((_, best_value)) if !(value > best_value) => {}
            _ => best = Some((index, value)),
        }
    }
    best
}
