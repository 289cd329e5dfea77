use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::info;

use adsift_core::config::PromptConfig;
use adsift_core::error::Result;
use adsift_core::traits::TextGenerator;

use super::llm::LlmCall;
use crate::contracts::{ExpandKeywordsInput, ExpandKeywordsOutput};
use crate::graph::Step;

/// Higher temperature: expansion favours variety over precision.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Generates long-tail keyword candidates from the product description and seeds.
pub struct ExpandKeywords {
    call: LlmCall,
}

impl ExpandKeywords {
    pub fn new(generator: Arc<dyn TextGenerator>, prompt: PromptConfig, default_model: &str) -> Self {
        Self {
            call: LlmCall::new(generator, prompt, default_model, DEFAULT_TEMPERATURE),
        }
    }
}

impl Step for ExpandKeywords {
    type Input = ExpandKeywordsInput;
    type Output = ExpandKeywordsOutput;

    fn run(&self, input: ExpandKeywordsInput) -> BoxFuture<'_, Result<ExpandKeywordsOutput>> {
        Box::pin(async move {
            let vars = HashMap::from([
                ("product_description", input.product_info.as_str()),
                ("seed_keywords", input.seed_keywords.as_str()),
            ]);
            let longtail_keywords = self.call.complete(&vars).await?;
            info!(
                candidates = longtail_keywords.lines().filter(|l| !l.trim().is_empty()).count(),
                "Keyword expansion complete"
            );
            Ok(ExpandKeywordsOutput { longtail_keywords })
        })
    }
}
