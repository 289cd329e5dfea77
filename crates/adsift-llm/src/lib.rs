pub mod providers;

use adsift_core::config::ModelConfig;
use adsift_core::error::{AdsiftError, Result};
use adsift_core::traits::TextGenerator;

pub use providers::anthropic::AnthropicClient;
pub use providers::openai::OpenAiClient;

/// Create a text-generation client based on the provider name.
pub fn create_client(config: &ModelConfig) -> Result<Box<dyn TextGenerator>> {
    match config.provider.as_str() {
        "anthropic" | "claude" => Ok(Box::new(AnthropicClient::new(config)?)),
        // OpenAI-compatible gateways (OpenAI, Ollama, vLLM, Ark, OpenRouter, ...)
        "openai" | "ollama" | "vllm" | "ark" | "doubao" | "openrouter" | "compatible" => {
            Ok(Box::new(OpenAiClient::new(config)?))
        }
        other => Err(AdsiftError::UnsupportedProvider(other.to_string())),
    }
}
