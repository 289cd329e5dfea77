use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::{Captures, Regex};
use tracing::debug;

use adsift_core::config::PromptConfig;
use adsift_core::error::Result;
use adsift_core::traits::TextGenerator;
use adsift_core::types::GenerationRequest;

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Substitute `{{ name }}` placeholders. Unknown names render empty.
pub fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures| {
            vars.get(&caps[1]).copied().unwrap_or_default().to_string()
        })
        .into_owned()
}

/// Prompt + sampling settings of one LLM-backed step, bound to a collaborator.
#[derive(Clone)]
pub struct LlmCall {
    generator: Arc<dyn TextGenerator>,
    system_instruction: String,
    user_prompt_template: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl LlmCall {
    /// Resolve a prompt config against the step's sampling defaults.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        prompt: PromptConfig,
        default_model: &str,
        default_temperature: f32,
    ) -> Self {
        Self {
            generator,
            system_instruction: prompt.system_instruction,
            user_prompt_template: prompt.user_prompt_template,
            model: prompt
                .model
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| default_model.to_string()),
            temperature: prompt.temperature.unwrap_or(default_temperature).clamp(0.0, 1.0),
            max_output_tokens: prompt
                .max_output_tokens
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request for the given template variables.
    pub fn request(&self, vars: &HashMap<&str, &str>) -> GenerationRequest {
        GenerationRequest {
            system_instruction: self.system_instruction.clone(),
            user_prompt: render_template(&self.user_prompt_template, vars),
            model: self.model.clone(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Call the collaborator and flatten its answer to plain text.
    pub async fn complete(&self, vars: &HashMap<&str, &str>) -> Result<String> {
        let request = self.request(vars);
        debug!(
            model = %request.model,
            temperature = request.temperature,
            prompt_chars = request.user_prompt.len(),
            "Invoking text generator"
        );
        let content = self.generator.invoke(request).await?;
        Ok(content.into_text())
    }
}
