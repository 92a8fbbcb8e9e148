//! Data model exchanged between the detection and analysis stages.
//!
//! - [`DiseaseRecord`]: one entry of the condition catalog
//! - [`DetectionResult`]: outcome of classifying one image
//! - [`DetailedAnalysis`]: the five-section explanatory text
//! - [`AnalysisOutput`]: what the caller finally receives

use serde::{Deserialize, Serialize};

/// Disease name reported when neither inference path produced a result.
pub const SENTINEL_DISEASE: &str = "Unknown/Normal";

/// Static metadata for one known condition.
///
/// The position of a record inside the catalog is the classifier's output
/// class index for that condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub name: String,
    pub overview: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub treatments: Vec<String>,
}

/// Result of one detection request.
///
/// Built once per request through [`DetectionResult::from_record`],
/// [`DetectionResult::from_parts`] or [`DetectionResult::sentinel`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    disease: String,
    probability: f32,
    overview: String,
    symptoms: Vec<String>,
    causes: Vec<String>,
    treatments: Vec<String>,
    elapsed_seconds: f64,
}

impl DetectionResult {
    /// Assemble a result from the matched catalog record.
    pub fn from_record(record: &DiseaseRecord, probability: f32, elapsed_seconds: f64) -> Self {
        Self {
            disease: record.name.clone(),
            probability,
            overview: record.overview.clone(),
            symptoms: record.symptoms.clone(),
            causes: record.causes.clone(),
            treatments: record.treatments.clone(),
            elapsed_seconds,
        }
    }

    /// Assemble a result from already-validated field values.
    pub fn from_parts(
        disease: String,
        probability: f32,
        overview: String,
        symptoms: Vec<String>,
        causes: Vec<String>,
        treatments: Vec<String>,
        elapsed_seconds: f64,
    ) -> Self {
        Self {
            disease,
            probability,
            overview,
            symptoms,
            causes,
            treatments,
            elapsed_seconds,
        }
    }

    /// The degraded low-confidence result returned when both inference paths fail.
    pub fn sentinel() -> Self {
        Self {
            disease: SENTINEL_DISEASE.to_string(),
            probability: 0.0,
            overview: "Unable to detect skin condition. This may be normal skin or the image \
                       quality may not be sufficient for analysis."
                .to_string(),
            symptoms: vec!["No specific symptoms identified".to_string()],
            causes: vec!["Analysis inconclusive".to_string()],
            treatments: vec!["Consult a dermatologist for professional evaluation".to_string()],
            elapsed_seconds: 0.0,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.disease == SENTINEL_DISEASE && self.probability == 0.0
    }

    pub fn disease(&self) -> &str {
        &self.disease
    }

    /// Raw classifier confidence. Not guaranteed to lie in `[0, 1]`.
    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn overview(&self) -> &str {
        &self.overview
    }

    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn treatments(&self) -> &[String] {
        &self.treatments
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Treatments joined into the advice line handed to the analysis stage.
    pub fn basic_advice(&self) -> String {
        self.treatments.join(", ")
    }
}

/// Long-form guidance split into five sections.
///
/// Every producer must fill all five fields; blank fields are replaced from
/// the canned fallback through [`DetailedAnalysis::backfill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub overview: String,
    pub detection_details: String,
    pub recommendations: String,
    pub important_notes: String,
    pub next_steps: String,
}

impl DetailedAnalysis {
    /// JSON keys of the five sections, in section order.
    pub const SECTION_KEYS: [&'static str; 5] = [
        "overview",
        "detection_details",
        "recommendations",
        "important_notes",
        "next_steps",
    ];

    /// True when every section holds non-whitespace text.
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|field| !field.trim().is_empty())
    }

    /// Replace every blank section with the matching section of `fallback`.
    pub fn backfill(mut self, fallback: &DetailedAnalysis) -> Self {
        fill_blank(&mut self.overview, &fallback.overview);
        fill_blank(&mut self.detection_details, &fallback.detection_details);
        fill_blank(&mut self.recommendations, &fallback.recommendations);
        fill_blank(&mut self.important_notes, &fallback.important_notes);
        fill_blank(&mut self.next_steps, &fallback.next_steps);
        self
    }

    fn fields(&self) -> [&str; 5] {
        [
            &self.overview,
            &self.detection_details,
            &self.recommendations,
            &self.important_notes,
            &self.next_steps,
        ]
    }
}

fn fill_blank(field: &mut String, replacement: &str) {
    if field.trim().is_empty() {
        *field = replacement.to_string();
    }
}

/// Final object returned to the caller: detection fields plus optional analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    #[serde(flatten)]
    pub detection: DetectionResult,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detailed_analysis: Option<DetailedAnalysis>,
}

impl AnalysisOutput {
    pub fn new(detection: DetectionResult, detailed_analysis: Option<DetailedAnalysis>) -> Self {
        Self {
            detection,
            detailed_analysis,
        }
    }
}
