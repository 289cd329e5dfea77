use futures::future::BoxFuture;

use crate::error::Result;
use crate::types::{GenerationRequest, ResponseContent};

/// Text-generation collaborator used by the LLM-backed steps.
///
/// Implementations own transport, authentication and timeout policy. Errors
/// are fatal to the calling step; nothing in the pipeline retries.
pub trait TextGenerator: Send + Sync + 'static {
    /// Generate a completion for one system instruction + user prompt pair.
    fn invoke(&self, request: GenerationRequest) -> BoxFuture<'_, Result<ResponseContent>>;
}
