use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of one pipeline run.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the advertising search-term report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub search_term: String,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub orders: u64,
}

impl KeywordRecord {
    pub fn new(search_term: impl Into<String>, clicks: u64, spend: f64, orders: u64) -> Self {
        Self {
            search_term: search_term.into(),
            clicks,
            spend,
            orders,
        }
    }
}

/// A search term flagged for negation, with the reason it was flagged.
///
/// Statistically derived records carry the report numbers; semantically
/// derived ones carry zeros since no evidence is known for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeRecord {
    #[serde(flatten)]
    pub keyword: KeywordRecord,
    pub reason: String,
}

impl NegativeRecord {
    pub fn flagged(keyword: KeywordRecord, reason: impl Into<String>) -> Self {
        Self {
            keyword,
            reason: reason.into(),
        }
    }

    pub fn semantic(search_term: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            keyword: KeywordRecord::new(search_term, 0, 0.0, 0),
            reason: reason.into(),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.keyword.search_term
    }
}

/// How literally a keyword must match a shopper query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

/// Suggested bid level. Serialized with the labels used in the reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bid {
    #[serde(rename = "低")]
    Low,
    #[serde(rename = "中")]
    Medium,
    #[serde(rename = "高")]
    High,
}

/// Bidding guidance for one candidate keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendRecord {
    pub keyword: String,
    pub match_type: MatchType,
    pub competition: String,
    pub bid: Bid,
    pub reason: String,
}

/// A single text-generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Content returned by a text-generation collaborator.
///
/// Providers answer either with a plain string or with a list of typed
/// content parts; anything else is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseContent {
    Text(String),
    Parts(Vec<serde_json::Value>),
    Raw(serde_json::Value),
}

impl ResponseContent {
    /// Flatten the response into one string.
    ///
    /// Parts contribute when they are bare strings or `{"type": "text"}`
    /// objects; contributions are joined with single spaces.
    pub fn into_text(self) -> String {
        match self {
            ResponseContent::Text(text) => text,
            ResponseContent::Parts(parts) => parts
                .into_iter()
                .filter_map(|part| match part {
                    serde_json::Value::String(s) => Some(s),
                    serde_json::Value::Object(obj)
                        if obj.get("type").and_then(|t| t.as_str()) == Some("text") =>
                    {
                        Some(
                            obj.get("text")
                                .and_then(|t| t.as_str())
                                .unwrap_or_default()
                                .to_string(),
                        )
                    }
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
            ResponseContent::Raw(serde_json::Value::String(s)) => s,
            ResponseContent::Raw(other) => other.to_string(),
        }
    }
}

impl From<String> for ResponseContent {
    fn from(text: String) -> Self {
        ResponseContent::Text(text)
    }
}

impl From<&str> for ResponseContent {
    fn from(text: &str) -> Self {
        ResponseContent::Text(text.to_string())
    }
}
