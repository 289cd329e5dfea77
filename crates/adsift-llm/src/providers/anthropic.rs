use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use adsift_core::config::ModelConfig;
use adsift_core::error::{AdsiftError, Result};
use adsift_core::traits::TextGenerator;
use adsift_core::types::{GenerationRequest, ResponseContent};

use super::{check_status, http_client};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl AnthropicClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            url: config
                .base_url
                .clone()
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            api_key: config.api_key.clone(),
        })
    }
}

// Anthropic API request types
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<ApiMessage>,
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

// Anthropic API response types
#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<serde_json::Value>,
}

fn build_request(request: GenerationRequest) -> AnthropicRequest {
    AnthropicRequest {
        model: request.model,
        max_tokens: request.max_output_tokens,
        temperature: request.temperature,
        system: request.system_instruction,
        messages: vec![ApiMessage {
            role: "user",
            content: request.user_prompt,
        }],
    }
}

fn extract_content(body: &str) -> Result<ResponseContent> {
    let parsed: AnthropicResponse =
        serde_json::from_str(body).map_err(|e| AdsiftError::LlmParse(e.to_string()))?;
    Ok(ResponseContent::Parts(parsed.content))
}

impl TextGenerator for AnthropicClient {
    fn invoke(&self, request: GenerationRequest) -> BoxFuture<'_, Result<ResponseContent>> {
        Box::pin(async move {
            let body = build_request(request);
            debug!(model = %body.model, "Sending Anthropic messages request");

            let mut req = self
                .http
                .post(&self.url)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body);
            if let Some(api_key) = &self.api_key {
                req = req.header("x-api-key", api_key);
            }

            let response = req
                .send()
                .await
                .map_err(|e| AdsiftError::LlmRequest(e.to_string()))?;
            let response = check_status(response).await?;
            let text = response
                .text()
                .await
                .map_err(|e| AdsiftError::LlmRequest(e.to_string()))?;

            extract_content(&text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_omits_empty_system() {
        let body = build_request(GenerationRequest {
            system_instruction: String::new(),
            user_prompt: "list keywords".into(),
            model: "claude-sonnet-4-20250514".into(),
            temperature: 0.7,
            max_output_tokens: 4096,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "list keywords");
    }

    #[test]
    fn test_extract_text_blocks() {
        let body = r#"{"id":"msg_1","content":[{"type":"text","text":"yoga mat"},{"type":"text","text":"for travel"}]}"#;
        let content = extract_content(body).unwrap();
        assert_eq!(content.into_text(), "yoga mat for travel");
    }

    #[test]
    fn test_extract_garbage_body() {
        let err = extract_content("<html>").unwrap_err();
        assert!(matches!(err, AdsiftError::LlmParse(_)));
    }
}
