use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, info};

use adsift_core::config::PromptConfig;
use adsift_core::error::Result;
use adsift_core::traits::TextGenerator;
use adsift_core::types::KeywordRecord;

use super::llm::LlmCall;
use crate::contracts::{SemanticJudgeInput, SemanticJudgeOutput};
use crate::graph::Step;

/// Low temperature: relevance judgments favour precision.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Asks the text generator which remaining terms are unrelated to the product.
///
/// The answer is free text, one `search_term | reason` (or bare term) per line.
pub struct SemanticJudge {
    call: LlmCall,
}

impl SemanticJudge {
    pub fn new(generator: Arc<dyn TextGenerator>, prompt: PromptConfig, default_model: &str) -> Self {
        Self {
            call: LlmCall::new(generator, prompt, default_model, DEFAULT_TEMPERATURE),
        }
    }
}

impl Step for SemanticJudge {
    type Input = SemanticJudgeInput;
    type Output = SemanticJudgeOutput;

    fn run(&self, input: SemanticJudgeInput) -> BoxFuture<'_, Result<SemanticJudgeOutput>> {
        Box::pin(async move {
            if input.remaining_keywords.is_empty() {
                debug!("No remaining keywords, skipping semantic judgment");
                return Ok(SemanticJudgeOutput {
                    semantic_bad: String::new(),
                });
            }

            let keywords_text = keywords_text(&input.remaining_keywords);
            let vars = HashMap::from([
                ("product_info", input.product_info.as_str()),
                ("keywords_text", keywords_text.as_str()),
            ]);
            let semantic_bad = self.call.complete(&vars).await?;

            info!(
                judged = input.remaining_keywords.len(),
                flagged_lines = semantic_bad.lines().filter(|l| !l.trim().is_empty()).count(),
                "Semantic judgment complete"
            );
            Ok(SemanticJudgeOutput { semantic_bad })
        })
    }
}

/// Newline-joined search terms, skipping empty ones.
pub fn keywords_text(records: &[KeywordRecord]) -> String {
    records
        .iter()
        .map(|r| r.search_term.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsift_core::error::AdsiftError;
    use adsift_test_utils::MockGenerator;

    fn prompt() -> PromptConfig {
        PromptConfig {
            system_instruction: "Judge relevance.".into(),
            user_prompt_template: "Product: {{ product_info }}\n{{ keywords_text }}".into(),
            ..PromptConfig::default()
        }
    }

    #[test]
    fn test_keywords_text_skips_empty_terms() {
        let records = vec![
            KeywordRecord::new("dog bed", 1, 1.0, 0),
            KeywordRecord::new("", 1, 1.0, 0),
            KeywordRecord::new("yoga mat", 1, 1.0, 0),
        ];
        assert_eq!(keywords_text(&records), "dog bed\nyoga mat");
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let mock = Arc::new(MockGenerator::new().with_text("should not be used"));
        let step = SemanticJudge::new(mock.clone(), prompt(), "m");
        let out = step
            .run(SemanticJudgeInput {
                remaining_keywords: vec![],
                product_info: "yoga mat".into(),
            })
            .await
            .unwrap();
        assert_eq!(out.semantic_bad, "");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_renders_prompt_and_returns_text() {
        let mock = Arc::new(MockGenerator::new().with_text("dog bed | wrong category"));
        let step = SemanticJudge::new(mock.clone(), prompt(), "judge-model");
        let out = step
            .run(SemanticJudgeInput {
                remaining_keywords: vec![
                    KeywordRecord::new("dog bed", 2, 1.0, 0),
                    KeywordRecord::new("yoga mat", 2, 1.0, 1),
                ],
                product_info: "TPE yoga mat".into(),
            })
            .await
            .unwrap();
        assert_eq!(out.semantic_bad, "dog bed | wrong category");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_instruction, "Judge relevance.");
        assert_eq!(requests[0].user_prompt, "Product: TPE yoga mat\ndog bed\nyoga mat");
        assert_eq!(requests[0].model, "judge-model");
        assert_eq!(requests[0].temperature, DEFAULT_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_collaborator_failure_propagates() {
        let mock = Arc::new(MockGenerator::new().failing("HTTP 503"));
        let step = SemanticJudge::new(mock, PromptConfig::default(), "m");
        let err = step
            .run(SemanticJudgeInput {
                remaining_keywords: vec![KeywordRecord::new("x", 1, 1.0, 0)],
                product_info: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AdsiftError::LlmRequest(_)));
    }
}
