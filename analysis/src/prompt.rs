//! Prompt construction for the text-generation service.

use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "You are a medical AI assistant providing educational information about skin conditions. Always emphasize that AI analysis is not a substitute for professional medical diagnosis and care.";

/// One chat message in OpenAI wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Format a 0..1 confidence as a percentage with one decimal, e.g. `85.0`.
pub fn format_percent(confidence: f32) -> String {
    format!("{:.1}", confidence * 100.0)
}

/// User prompt asking for the five analysis sections as a JSON object.
pub fn build_prompt(condition: &str, confidence: f32, basic_advice: &str) -> String {
    format!(
        r#"You are a medical AI assistant providing detailed educational information about skin conditions. Based on the detected condition "{condition}" with {percent}% confidence, provide comprehensive information for each section below.

IMPORTANT: Always include medical disclaimers and emphasize the need for professional consultation.

Please provide detailed information in the following format:

1. OVERVIEW: A comprehensive description of the condition, including what it is, how common it is, and who it typically affects.

2. DETECTION_DETAILS: Explain what visual features the AI likely detected, what the confidence level means, and the limitations of image-based detection.

3. RECOMMENDATIONS: Detailed care and treatment recommendations, building on the basic advice below, including lifestyle and skincare measures.

4. IMPORTANT_NOTES: Medical disclaimers, warning signs that require urgent attention, and conditions that may look similar.

5. NEXT_STEPS: A clear, numbered action plan, including when and whom to consult.

Basic advice from initial analysis: {basic_advice}

Format your response as a JSON object with keys: {keys}"#,
        condition = condition,
        percent = format_percent(confidence),
        basic_advice = basic_advice,
        keys = common::DetailedAnalysis::SECTION_KEYS.join(", "),
    )
}

/// The `[system, user]` pair sent for one analysis.
pub fn build_messages(condition: &str, confidence: f32, basic_advice: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_prompt(condition, confidence, basic_advice)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_inputs_and_keys() {
        let prompt = build_prompt("Eczema", 0.873, "Moisturizers, Avoid triggers");

        assert!(prompt.contains("\"Eczema\""));
        assert!(prompt.contains("87.3% confidence"));
        assert!(prompt.contains("Basic advice from initial analysis: Moisturizers, Avoid triggers"));
        assert!(prompt.contains("overview, detection_details, recommendations, important_notes, next_steps"));
        assert!(prompt.contains("professional consultation"));
        for label in ["OVERVIEW", "DETECTION_DETAILS", "RECOMMENDATIONS", "IMPORTANT_NOTES", "NEXT_STEPS"] {
            assert!(prompt.contains(label), "missing {}", label);
        }
    }

    #[test]
    fn test_messages_order() {
        let messages = build_messages("Acne", 0.5, "");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, SYSTEM_PROMPT);
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("50.0%"));
    }
}
