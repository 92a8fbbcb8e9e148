//! Detection coordinator.
//!
//! Drives one request through an explicit state machine:
//!
//! ```text
//! Preprocess -> TryLocal -+-> Assemble
//!                         +-> TryRemote -+-> Assemble
//!                                        +-> Degrade
//! ```
//!
//! Decode failures and catalog/index faults propagate; every other failure
//! ends in `Degrade`, which yields the "Unknown/Normal" sentinel.

use crate::catalog::DiseaseCatalog;
use crate::config::DetectionConfig;
use crate::engine::{Classifier, LocalInferenceEngine};
use crate::error::{CatalogError, Result};
use crate::preprocess::ImagePreprocessor;
use crate::remote::{RemoteDetector, RemoteInferenceClient};
use common::DetectionResult;
use image::RgbImage;
use ndarray::Array4;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a request ended up with the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    LocalInferenceFailed(String),
    RemoteFailed(String),
    NoRemoteConfigured,
}

/// Per-request states.
#[derive(Debug)]
enum Stage {
    TryLocal { image: RgbImage, tensor: Array4<f32> },
    TryRemote { image: RgbImage },
    Assemble(DetectionResult),
    Degrade(DegradeReason),
}

/// Orchestrates preprocessing, local inference, remote fallback and catalog lookup.
pub struct DetectionCoordinator {
    catalog: Arc<DiseaseCatalog>,
    preprocessor: ImagePreprocessor,
    local: Arc<dyn Classifier>,
    remote: Option<Box<dyn RemoteDetector>>,
}

impl DetectionCoordinator {
    pub fn new(
        catalog: Arc<DiseaseCatalog>,
        local: Arc<dyn Classifier>,
        remote: Option<Box<dyn RemoteDetector>>,
    ) -> Self {
        Self {
            catalog,
            preprocessor: ImagePreprocessor::default(),
            local,
            remote,
        }
    }

    /// Boot phase: load the catalog and wire the production engine and client.
    ///
    /// The model session itself is still created lazily on first request.
    pub fn from_config(config: &DetectionConfig) -> std::result::Result<Self, CatalogError> {
        let catalog = Arc::new(DiseaseCatalog::load(&config.catalog_path)?);
        let local: Arc<dyn Classifier> = Arc::new(LocalInferenceEngine::from_config(config));

        let remote = config.remote_url.as_ref().and_then(|url| {
            let timeout = Duration::from_secs(config.remote_timeout_secs);
            match RemoteInferenceClient::new(url.clone(), timeout) {
                Ok(client) => Some(Box::new(client) as Box<dyn RemoteDetector>),
                Err(e) => {
                    tracing::error!(error = %e, "Remote detection client disabled");
                    None
                }
            }
        });

        Ok(Self::new(catalog, local, remote))
    }

    /// Condition names the classifier can report.
    pub fn supported_diseases(&self) -> Vec<&str> {
        self.catalog.names()
    }

    /// Classify one uploaded image.
    pub fn detect(&self, image_bytes: &[u8]) -> Result<DetectionResult> {
        // Preprocess
        let image = self.preprocessor.decode(image_bytes)?;
        let tensor = self.preprocessor.to_tensor(&image);

        let mut stage = Stage::TryLocal { image, tensor };
        loop {
            stage = match stage {
                Stage::TryLocal { image, tensor } => self.try_local(image, &tensor)?,
                Stage::TryRemote { image } => self.try_remote(&image),
                Stage::Assemble(result) => {
                    tracing::info!(
                        disease = result.disease(),
                        probability = result.probability(),
                        elapsed = result.elapsed_seconds(),
                        "Detection complete"
                    );
                    return Ok(result);
                }
                Stage::Degrade(reason) => {
                    tracing::warn!(reason = ?reason, "Detection degraded to sentinel result");
                    return Ok(DetectionResult::sentinel());
                }
            };
        }
    }

    fn try_local(&self, image: RgbImage, tensor: &Array4<f32>) -> Result<Stage> {
        if !self.local.available() {
            return Ok(Stage::TryRemote { image });
        }

        let started = Instant::now();
        let outcome = self.local.infer(tensor);
        let elapsed = started.elapsed().as_secs_f64();

        match outcome {
            Ok((index, confidence)) => {
                let record = self.catalog.get(index)?;
                Ok(Stage::Assemble(DetectionResult::from_record(record, confidence, elapsed)))
            }
            Err(e) => Ok(Stage::Degrade(DegradeReason::LocalInferenceFailed(e.to_string()))),
        }
    }

    fn try_remote(&self, image: &RgbImage) -> Stage {
        let Some(remote) = self.remote.as_ref() else {
            return Stage::Degrade(DegradeReason::NoRemoteConfigured);
        };

        let started = Instant::now();
        match remote.detect(image) {
            Ok(detection) => {
                let elapsed = started.elapsed().as_secs_f64();
                Stage::Assemble(detection.into_result(elapsed))
            }
            Err(e) => Stage::Degrade(DegradeReason::RemoteFailed(e.to_string())),
        }
    }
}
