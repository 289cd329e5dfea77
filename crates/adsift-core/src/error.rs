use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdsiftError {
    // Text-generation errors
    #[error("LLM request failed: {0}")]
    LlmRequest(String),

    #[error("LLM response parse error: {0}")]
    LlmParse(String),

    #[error("LLM provider not supported: {0}")]
    UnsupportedProvider(String),

    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // Graph errors
    #[error("Invalid graph: {0}")]
    Graph(String),

    #[error("Contract violation in step {step}: {message}")]
    Contract { step: String, message: String },

    #[error("Step {step} failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: Box<AdsiftError>,
    },

    #[error("Step task aborted: {0}")]
    TaskJoin(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdsiftError {
    /// Wrap an error with the id of the step that raised it.
    ///
    /// Already-wrapped errors are returned unchanged so the innermost step
    /// stays the one reported.
    pub fn in_step(self, step: impl Into<String>) -> Self {
        match self {
            e @ AdsiftError::StepFailed { .. } => e,
            other => AdsiftError::StepFailed {
                step: step.into(),
                source: Box::new(other),
            },
        }
    }

    /// The id of the failing step, if this error came out of a step.
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            AdsiftError::StepFailed { step, .. } => Some(step),
            AdsiftError::Contract { step, .. } => Some(step),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdsiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_step_wraps_once() {
        let err = AdsiftError::LlmRequest("HTTP 500".into())
            .in_step("semantic_judge")
            .in_step("outer");
        assert_eq!(err.failed_step(), Some("semantic_judge"));
        assert_eq!(
            err.to_string(),
            "Step semantic_judge failed: LLM request failed: HTTP 500"
        );
    }

    #[test]
    fn test_contract_reports_step() {
        let err = AdsiftError::Contract {
            step: "stats_filter".into(),
            message: "missing field".into(),
        };
        assert_eq!(err.failed_step(), Some("stats_filter"));
    }
}
