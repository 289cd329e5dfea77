use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AdsiftError, Result};

/// Top-level adsift configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

/// Connection settings for the text-generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model used when a prompt config does not name one.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model_id: default_model_id(),
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String { "openai".to_string() }
fn default_model_id() -> String { "doubao-seed-1-8-251228".to_string() }
fn default_timeout_secs() -> u64 { 120 }

/// Rule thresholds for the deterministic steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Average order price; zero-order terms spending more than half of it are flagged.
    #[serde(default = "default_reference_average_price")]
    pub reference_average_price: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_average_price: default_reference_average_price(),
        }
    }
}

fn default_reference_average_price() -> f64 { 20.0 }

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    #[serde(default)]
    pub semantic_judge: PromptConfig,
    #[serde(default)]
    pub expand_keywords: PromptConfig,
}

/// Prompt and sampling settings for one LLM-backed step.
///
/// Everything is optional: an empty config yields an empty system
/// instruction and an empty rendered prompt, and sampling falls back to the
/// step's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Legacy JSON prompt file. Replaces the inline fields when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub system_instruction: String,
    #[serde(default)]
    pub user_prompt_template: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

/// On-disk shape of a legacy prompt file.
#[derive(Debug, Default, Deserialize)]
struct LegacyPromptFile {
    #[serde(default)]
    config: LegacySampling,
    #[serde(default)]
    sp: String,
    #[serde(default)]
    up: String,
}

#[derive(Debug, Default, Deserialize)]
struct LegacySampling {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    temperature: Option<f32>,
    #[serde(default)]
    max_completion_tokens: Option<u32>,
}

impl PromptConfig {
    /// Read a legacy `{config, sp, up}` JSON prompt file.
    ///
    /// A missing or unreadable file degrades to an empty config.
    pub fn from_legacy_file(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Prompt file unavailable, using empty prompt");
                return Self::default();
            }
        };
        match serde_json::from_str::<LegacyPromptFile>(&content) {
            Ok(file) => Self {
                file: Some(path.display().to_string()),
                system_instruction: file.sp,
                user_prompt_template: file.up,
                model: file.config.model,
                temperature: file.config.temperature,
                max_output_tokens: file.config.max_completion_tokens,
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Prompt file malformed, using empty prompt");
                Self::default()
            }
        }
    }

    /// Replace this config with the contents of its `file`, if one is set.
    ///
    /// Relative paths are resolved against `base_dir`.
    pub fn resolve_file(self, base_dir: &Path) -> Self {
        match self.file.as_deref() {
            Some(file) => {
                let path = base_dir.join(file);
                Self::from_legacy_file(&path)
            }
            None => self,
        }
    }
}

impl AppConfig {
    /// Load config from a TOML file, with env var expansion.
    ///
    /// Prompt files referenced by the config are read relative to the
    /// config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| AdsiftError::ConfigNotFound(path.display().to_string()))?;

        // Expand ${ENV_VAR} references
        let expanded = expand_env_vars(&content);

        let mut config: AppConfig =
            toml::from_str(&expanded).map_err(|e| AdsiftError::Config(e.to_string()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.prompts.semantic_judge = config.prompts.semantic_judge.resolve_file(base_dir);
        config.prompts.expand_keywords = config.prompts.expand_keywords.resolve_file(base_dir);

        if config.pipeline.reference_average_price < 0.0 {
            return Err(AdsiftError::Config(format!(
                "pipeline.reference_average_price must not be negative (got {})",
                config.pipeline.reference_average_price
            )));
        }

        Ok(config)
    }

    /// Load the config if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Copy of the config with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.model.api_key = config.model.api_key.as_deref().map(mask_key);
        config
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "****".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Expand `${ENV_VAR}` patterns in a string.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            match std::env::var(&var_name) {
                Ok(val) => result.push_str(&val),
                Err(_) => {
                    // Keep original if env var not set
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
