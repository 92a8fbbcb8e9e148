//! DermaScan front end: detection plus analysis behind one call.

pub mod config;
pub mod error;

use common::AnalysisOutput;
use derma_analysis::AnalysisGenerator;
use derma_detection::{CatalogError, DetectionCoordinator, DetectionError};
use std::path::Path;

pub use config::{AppConfig, CliArgs, Command, ConfigIssue, Severity};
pub use error::{CliError, CliResult};

/// Upload extensions accepted by `analyze` (case-insensitive).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Sample used by `test-analysis`.
pub const SAMPLE_CONDITION: &str = "acne";
pub const SAMPLE_CONFIDENCE: f32 = 0.85;
pub const SAMPLE_ADVICE: &str = "Use gentle cleanser twice daily";

/// Reject uploads whose name is not a PNG or JPEG.
pub fn check_extension(path: &Path) -> CliResult<()> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .map_or(false, |ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));

    if supported {
        Ok(())
    } else {
        Err(CliError::UnsupportedFileType(path.to_path_buf()))
    }
}

pub struct DermaService {
    coordinator: DetectionCoordinator,
    generator: AnalysisGenerator,
}

impl DermaService {
    pub fn new(coordinator: DetectionCoordinator, generator: AnalysisGenerator) -> Self {
        Self {
            coordinator,
            generator,
        }
    }

    /// Boot: load the catalog and wire both pipelines.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let coordinator = DetectionCoordinator::from_config(&config.detection)?;
        let generator = AnalysisGenerator::new(&config.analysis);
        Ok(Self::new(coordinator, generator))
    }

    /// Detect, then (optionally) attach the five-section analysis.
    pub fn analyze(&self, image_bytes: &[u8], with_analysis: bool) -> Result<AnalysisOutput, DetectionError> {
        let detection = self.coordinator.detect(image_bytes)?;

        let detailed = with_analysis.then(|| {
            tracing::info!(condition = detection.disease(), "Generating detailed analysis");
            self.generator.generate(
                detection.disease(),
                detection.probability(),
                &detection.basic_advice(),
            )
        });

        Ok(AnalysisOutput::new(detection, detailed))
    }

    pub fn supported_diseases(&self) -> Vec<&str> {
        self.coordinator.supported_diseases()
    }
}
