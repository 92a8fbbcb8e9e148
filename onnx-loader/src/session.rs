//! ONNX Session management for single-input image classifiers

use crate::error::{OnnxError, Result};
use crate::providers;
use ndarray::Array4;
use ort::execution_providers::ExecutionProviderDispatch;
use ort::inputs;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// ONNX inference session with smart defaults
///
/// # Architecture
/// A thin wrapper around `ort::Session` that:
/// - Adds: execution provider selection
/// - Adds: sensible defaults (Level3 optimization, 4/2 threads)
/// - Adds: named single-input / single-output f32 inference
///
/// `Session::run` needs exclusive access, so the session sits behind a
/// `Mutex`; clones share the same underlying session.
#[derive(Clone)]
pub struct OnnxSession {
    input_names: Vec<String>,
    output_names: Vec<String>,
    session: Arc<Mutex<Session>>,
}

impl OnnxSession {
    /// Load ONNX model with auto-selected execution providers
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        Self::load_with_providers(model_path, providers::auto_select_providers())
    }

    /// Load ONNX model with specific ort execution providers
    pub fn load_with_providers<P: AsRef<Path>>(
        model_path: P,
        ort_providers: Vec<ExecutionProviderDispatch>,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        log::info!("Loading ONNX model from: {:?}", model_path);

        if !model_path.exists() {
            return Err(OnnxError::ModelLoadFailed(format!(
                "Model file not found: {:?}",
                model_path
            )));
        }

        log::info!("Configuring session with {} execution providers", ort_providers.len());

        let session = Session::builder()
            .map_err(|e| OnnxError::SessionCreationFailed(e.to_string()))?
            .with_execution_providers(ort_providers)
            .map_err(|e| OnnxError::SessionCreationFailed(
                format!("Failed to set execution providers: {}", e)
            ))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| OnnxError::SessionCreationFailed(
                format!("Failed to set optimization level: {}", e)
            ))?
            .with_intra_threads(4)
            .map_err(|e| OnnxError::SessionCreationFailed(
                format!("Failed to set intra threads: {}", e)
            ))?
            .with_inter_threads(2)
            .map_err(|e| OnnxError::SessionCreationFailed(
                format!("Failed to set inter threads: {}", e)
            ))?
            .commit_from_file(model_path)
            .map_err(|e| OnnxError::ModelLoadFailed(e.to_string()))?;

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        log::info!("ONNX model loaded successfully");
        log::debug!("  - Inputs: {:?}", input_names);
        log::debug!("  - Outputs: {:?}", output_names);

        Ok(Self {
            input_names,
            output_names,
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Run one forward pass with a single named f32 input.
    ///
    /// # Returns
    /// The shape and flattened values of the named output tensor.
    pub fn run_f32(
        &self,
        input_name: &str,
        tensor: Array4<f32>,
        output_name: &str,
    ) -> Result<(Vec<i64>, Vec<f32>)> {
        if !self.input_names.iter().any(|name| name == input_name) {
            return Err(OnnxError::InvalidInput(format!(
                "Model has no input named '{}' (inputs: {:?})",
                input_name, self.input_names
            )));
        }
        if !self.output_names.iter().any(|name| name == output_name) {
            return Err(OnnxError::OutputNotFound(output_name.to_string()));
        }

        let input_value = Tensor::from_array(tensor)
            .map_err(|e| OnnxError::InvalidInput(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self.session.lock()
            .map_err(|e| OnnxError::InferenceFailed(format!("Session lock failed: {}", e)))?;

        let outputs = session
            .run(inputs![input_name => input_value])
            .map_err(|e| OnnxError::InferenceFailed(e.to_string()))?;

        let output = outputs
            .get(output_name)
            .ok_or_else(|| OnnxError::OutputNotFound(output_name.to_string()))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| OnnxError::InferenceFailed(format!("Failed to extract output tensor: {}", e)))?;

        log::debug!("Output '{}' shape: {:?}", output_name, shape);
        Ok((shape.to_vec(), data.to_vec()))
    }
}
