//! Remote detection fallback.
//!
//! Mirrors the local classifier's output contract through a hosted HTTP
//! service: one multipart POST per request, bounded by a timeout and never
//! retried.

use crate::error::RemoteServiceError;
use common::DetectionResult;
use image::{ImageFormat, RgbImage};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::io::Cursor;
use std::time::Duration;

/// Anything that can classify a decoded image out of process.
pub trait RemoteDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Result<RemoteDetection, RemoteServiceError>;
}

/// `time` is reported as a string by some deployments and a number by others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ReportedTime {
    Seconds(f64),
    Text(String),
}

/// Validated remote payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDetection {
    pub disease: String,
    pub overview: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub treatments: Vec<String>,
    pub probability: f32,
    #[serde(default)]
    time: Option<ReportedTime>,
}

impl RemoteDetection {
    /// Parse and validate a response body.
    pub fn from_json(body: &str) -> Result<Self, RemoteServiceError> {
        let payload: RemoteDetection = serde_json::from_str(body)
            .map_err(|e| RemoteServiceError::MalformedResponse(e.to_string()))?;

        if payload.disease.trim().is_empty() {
            return Err(RemoteServiceError::MalformedResponse(
                "disease is blank".to_string(),
            ));
        }
        if !payload.probability.is_finite() {
            return Err(RemoteServiceError::MalformedResponse(
                "probability is not a finite number".to_string(),
            ));
        }
        Ok(payload)
    }

    /// Elapsed seconds reported by the service, when it sent a usable value.
    pub fn reported_seconds(&self) -> Option<f64> {
        match &self.time {
            Some(ReportedTime::Seconds(s)) => Some(*s),
            Some(ReportedTime::Text(s)) => s.trim().parse().ok(),
            None => None,
        }
    }

    /// Build the final result; a reported time wins over the measured one.
    pub fn into_result(self, measured_seconds: f64) -> DetectionResult {
        let elapsed = self.reported_seconds().unwrap_or(measured_seconds);
        DetectionResult::from_parts(
            self.disease,
            self.probability,
            self.overview,
            self.symptoms,
            self.causes,
            self.treatments,
            elapsed,
        )
    }
}

/// HTTP client for the hosted detection endpoint.
pub struct RemoteInferenceClient {
    client: Client,
    url: String,
}

impl RemoteInferenceClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteServiceError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Use a caller-configured HTTP client (proxy, TLS or timeout settings).
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl RemoteDetector for RemoteInferenceClient {
    fn detect(&self, image: &RgbImage) -> Result<RemoteDetection, RemoteServiceError> {
        let mut jpeg = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .map_err(|e| RemoteServiceError::Encode(e.to_string()))?;

        let part = Part::bytes(jpeg)
            .file_name("image.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| RemoteServiceError::Request(e.to_string()))?;
        let form = Form::new().part("im", part);

        tracing::info!(url = %self.url, "Using hosted detection fallback");
        let response = self.client.post(&self.url).multipart(form).send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Hosted detection request failed");
            return Err(RemoteServiceError::Status(status.as_u16()));
        }

        let body = response.text()?;
        RemoteDetection::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "disease": "Psoriasis",
        "overview": "Scaly patches",
        "symptoms": ["Plaques"],
        "causes": ["Immune"],
        "treatments": ["Topicals"],
        "probability": 0.64
    }"#;

    #[test]
    fn test_payload_without_time_uses_measured() {
        let result = RemoteDetection::from_json(PAYLOAD).unwrap().into_result(1.25);
        assert_eq!(result.disease(), "Psoriasis");
        assert_eq!(result.elapsed_seconds(), 1.25);
    }

    #[test]
    fn test_reported_time_string_or_number() {
        let with_text = PAYLOAD.replace("\"probability\": 0.64", "\"probability\": 0.64, \"time\": \"0.5\"");
        let detection = RemoteDetection::from_json(&with_text).unwrap();
        assert_eq!(detection.reported_seconds(), Some(0.5));

        let with_number = PAYLOAD.replace("\"probability\": 0.64", "\"probability\": 0.64, \"time\": 2.0");
        let result = RemoteDetection::from_json(&with_number).unwrap().into_result(9.0);
        assert_eq!(result.elapsed_seconds(), 2.0);
    }

    #[test]
    fn test_schema_violations_are_named_faults() {
        let missing = r#"{"disease": "Psoriasis", "probability": 0.5}"#;
        assert!(matches!(
            RemoteDetection::from_json(missing),
            Err(RemoteServiceError::MalformedResponse(_))
        ));

        let blank = PAYLOAD.replace("Psoriasis", "");
        assert!(matches!(
            RemoteDetection::from_json(&blank),
            Err(RemoteServiceError::MalformedResponse(_))
        ));

        assert!(matches!(
            RemoteDetection::from_json("<html>502 Bad Gateway</html>"),
            Err(RemoteServiceError::MalformedResponse(_))
        ));
    }
}
