use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use adsift_core::config::ModelConfig;
use adsift_core::error::{AdsiftError, Result};
use adsift_core::traits::TextGenerator;
use adsift_core::types::{GenerationRequest, ResponseContent};

use super::{check_status, http_client};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible client. Works with OpenAI, Ollama, vLLM, Ark, OpenRouter, etc.
pub struct OpenAiClient {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_API_URL.to_string()),
            api_key: config.api_key.clone(),
        })
    }
}

// Request types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<OaiMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct OaiMessage {
    role: &'static str,
    content: String,
}

// Response types
#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<ResponseContent>,
}

fn build_request(request: GenerationRequest) -> ChatRequest {
    ChatRequest {
        model: request.model,
        messages: vec![
            OaiMessage {
                role: "system",
                content: request.system_instruction,
            },
            OaiMessage {
                role: "user",
                content: request.user_prompt,
            },
        ],
        max_tokens: request.max_output_tokens,
        temperature: request.temperature,
        stream: false,
    }
}

fn extract_content(body: &str) -> Result<ResponseContent> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| AdsiftError::LlmParse(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AdsiftError::LlmParse("response has no choices".into()))?;
    Ok(choice
        .message
        .content
        .unwrap_or_else(|| ResponseContent::Text(String::new())))
}

impl TextGenerator for OpenAiClient {
    fn invoke(&self, request: GenerationRequest) -> BoxFuture<'_, Result<ResponseContent>> {
        Box::pin(async move {
            let body = build_request(request);
            debug!(model = %body.model, url = %self.url, "Sending chat completion request");

            let mut req = self.http.post(&self.url).json(&body);
            if let Some(api_key) = &self.api_key {
                req = req.header("Authorization", format!("Bearer {}", api_key));
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
    fn test_build_request_shape() {
        let body = build_request(GenerationRequest {
            system_instruction: "sys".into(),
            user_prompt: "hello".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.3,
            max_output_tokens: 4096,
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_extract_string_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"kw | reason"}}]}"#;
        let content = extract_content(body).unwrap();
        assert_eq!(content.into_text(), "kw | reason");
    }

    #[test]
    fn test_extract_part_list_content() {
        let body = r#"{"choices":[{"message":{"content":[{"type":"text","text":"a"},{"type":"text","text":"b"}]}}]}"#;
        let content = extract_content(body).unwrap();
        assert_eq!(content.into_text(), "a b");
    }

    #[test]
    fn test_extract_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert_eq!(extract_content(body).unwrap().into_text(), "");
    }

    #[test]
    fn test_extract_no_choices() {
        let err = extract_content(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, AdsiftError::LlmParse(_)));
    }
}
