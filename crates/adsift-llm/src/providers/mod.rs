pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

use std::time::Duration;

use reqwest::Client;

use adsift_core::config::ModelConfig;
use adsift_core::error::{AdsiftError, Result};

/// Build the shared HTTP client with the configured request timeout.
pub(crate) fn http_client(config: &ModelConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AdsiftError::Config(format!("HTTP client: {}", e)))
}

/// Turn a non-success response into an `LlmRequest` error carrying the body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown".to_string());
    Err(AdsiftError::LlmRequest(format!("HTTP {}: {}", status, body)))
}
