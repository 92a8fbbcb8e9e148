//! OpenAI-compatible chat-completions transport.

use crate::config::AnalysisConfig;
use crate::error::AnalysisServiceError;
use crate::prompt::ChatMessage;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Sends one chat request and returns the first choice's text.
pub trait ChatBackend: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> Result<String, AnalysisServiceError>;
}

pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ChatCompletionClient {
    /// Build a client from settings; fails when no credential is configured.
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisServiceError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AnalysisServiceError::Request("API key not configured".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisServiceError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url, api_key))
    }

    pub fn with_client(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChatBackend for ChatCompletionClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, AnalysisServiceError> {
        tracing::debug!(endpoint = %self.endpoint, model = %request.model, "Requesting analysis text");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisServiceError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AnalysisServiceError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                AnalysisServiceError::MalformedResponse("response has no message content".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let client = ChatCompletionClient::with_client(Client::new(), "https://openrouter.ai/api/v1/", "k");
        assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn test_new_requires_key() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            ChatCompletionClient::new(&config),
            Err(AnalysisServiceError::Request(_))
        ));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: 2000,
            temperature: 0.3,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }
}
