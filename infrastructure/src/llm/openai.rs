//! OpenAI-compatible chat completions gateway.
//!
//! Talks to any endpoint speaking the `/v1/chat/completions` wire format.
//! No request timeout is set on completions: long generations are expected
//! to take a while.

use crate::config::FileLlmConfig;
use async_trait::async_trait;
use dogtalk_application::ports::llm_gateway::{GatewayError, LlmGateway};
use dogtalk_domain::Message;
use serde_json::json;
use tracing::debug;

/// Gateway adapter for OpenAI-compatible completion endpoints.
pub struct OpenAiGateway {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiGateway {
    pub fn new(config: &FileLlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn payload(&self, messages: &[Message]) -> serde_json::Value {
        let messages: Vec<_> = messages
            .iter()
            .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
            .collect();
        json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::MissingCredentials(
                "set OPENAI_API_KEY or [llm].api_key".to_string(),
            ));
        }

        debug!("Completion request: {} messages to {}", messages.len(), self.model);

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(messages))
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!("{}: {}", status, body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::InvalidResponse("no choices[0].message.content in response".to_string())
            })
    }
}
