//! Test doubles and fixtures shared by the adsift crates.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::json;

use adsift_core::error::{AdsiftError, Result};
use adsift_core::traits::TextGenerator;
use adsift_core::types::{GenerationRequest, ResponseContent};

/// Report whose first line trips the click rule and whose second converts.
pub const SAMPLE_REPORT: &str = "blue widget 15 12.00 0\nred widget 3 2.00 1";

/// Numbered long-tail list as a text generator would return it.
pub const SAMPLE_LONGTAIL: &str = "1. yoga mat for beginners with carry strap\n2. mat";

struct Rule {
    needle: String,
    response: ResponseContent,
    delay: Duration,
}

/// Scripted `TextGenerator`.
///
/// Responses are picked by the first rule whose needle occurs in the system
/// instruction or the rendered prompt; otherwise the default response is
/// used. Every request is recorded.
pub struct MockGenerator {
    default: ResponseContent,
    rules: Vec<Rule>,
    failure: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            default: ResponseContent::Text(String::new()),
            rules: vec![],
            failure: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(vec![]),
        }
    }

    /// Plain-text default response.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.default = ResponseContent::Text(text.into());
        self
    }

    /// Default response as a list of `{"type": "text"}` parts.
    pub fn with_parts(mut self, parts: Vec<&str>) -> Self {
        self.default = ResponseContent::Parts(
            parts
                .into_iter()
                .map(|p| json!({"type": "text", "text": p}))
                .collect(),
        );
        self
    }

    /// Answer `text` when `needle` occurs in the request.
    pub fn respond_to(self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.respond_to_after(needle, text, Duration::ZERO)
    }

    /// Like `respond_to`, but only after `delay`.
    pub fn respond_to_after(
        mut self,
        needle: impl Into<String>,
        text: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.rules.push(Rule {
            needle: needle.into(),
            response: ResponseContent::Text(text.into()),
            delay,
        });
        self
    }

    /// Fail every call with an `LlmRequest` error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn pick(&self, request: &GenerationRequest) -> (ResponseContent, Duration) {
        self.rules
            .iter()
            .find(|rule| {
                request.system_instruction.contains(&rule.needle)
                    || request.user_prompt.contains(&rule.needle)
            })
            .map(|rule| (rule.response.clone(), rule.delay))
            .unwrap_or_else(|| (self.default.clone(), Duration::ZERO))
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextGenerator for MockGenerator {
    fn invoke(&self, request: GenerationRequest) -> BoxFuture<'_, Result<ResponseContent>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (response, delay) = self.pick(&request);
            if let Ok(mut log) = self.requests.lock() {
                log.push(request);
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match &self.failure {
                Some(message) => Err(AdsiftError::LlmRequest(message.clone())),
                None => Ok(response),
            }
        })
    }
}
