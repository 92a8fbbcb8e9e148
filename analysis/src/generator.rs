//! Layered analysis generation.
//!
//! Generated JSON first, then the section parser over raw text, then the
//! canned templates. `generate` never fails.

use crate::client::{ChatBackend, ChatCompletionClient, ChatRequest};
use crate::config::AnalysisConfig;
use crate::fallback::canned_analysis;
use crate::prompt::build_messages;
use crate::sections::parse_sections;
use common::DetailedAnalysis;
use serde::Deserialize;

/// Section values arrive as plain text or, from some models, as a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum SectionText {
    Text(String),
    Lines(Vec<String>),
}

impl SectionText {
    fn into_text(self) -> String {
        match self {
            SectionText::Text(text) => text,
            SectionText::Lines(lines) => lines.join("\n"),
        }
    }
}

#[derive(Deserialize)]
struct StructuredSections {
    overview: SectionText,
    detection_details: SectionText,
    recommendations: SectionText,
    important_notes: SectionText,
    next_steps: SectionText,
}

pub struct AnalysisGenerator {
    backend: Option<Box<dyn ChatBackend>>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnalysisGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        let backend = if config.is_configured() {
            match ChatCompletionClient::new(config) {
                Ok(client) => Some(Box::new(client) as Box<dyn ChatBackend>),
                Err(e) => {
                    tracing::error!(error = %e, "Analysis client disabled");
                    None
                }
            }
        } else {
            tracing::info!("No analysis API key configured, using canned analysis");
            None
        };

        Self {
            backend,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn with_backend(backend: Box<dyn ChatBackend>, config: &AnalysisConfig) -> Self {
        Self {
            backend: Some(backend),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Five-section analysis for a detected condition.
    pub fn generate(&self, condition: &str, confidence: f32, basic_advice: &str) -> DetailedAnalysis {
        let Some(backend) = self.backend.as_ref() else {
            return canned_analysis(condition, basic_advice, confidence);
        };

        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(condition, confidence, basic_advice),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let content = match backend.complete(&request) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "Analysis service unavailable, using canned analysis");
                return canned_analysis(condition, basic_advice, confidence);
            }
        };

        match parse_structured(&content) {
            Some(analysis) => analysis.backfill(&canned_analysis(condition, basic_advice, confidence)),
            None => {
                tracing::debug!("Analysis text is not structured JSON, parsing sections");
                parse_sections(&content, condition, basic_advice, confidence)
            }
        }
    }
}

fn parse_structured(content: &str) -> Option<DetailedAnalysis> {
    let sections: StructuredSections = serde_json::from_str(strip_code_fences(content)).ok()?;
    Some(DetailedAnalysis {
        overview: sections.overview.into_text(),
        detection_details: sections.detection_details.into_text(),
        recommendations: sections.recommendations.into_text(),
        important_notes: sections.important_notes.into_text(),
        next_steps: sections.next_steps.into_text(),
    })
}

/// Drop a surrounding markdown fence (```` ``` ```` or ```` ```json ````).
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}
