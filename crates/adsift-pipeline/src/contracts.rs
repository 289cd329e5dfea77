//! Input/output records of every step and of the three run entry points.
//!
//! Field names double as pipeline-state keys, so each record's fields must
//! match the keys its node declares (see [`keys`]).

use serde::{Deserialize, Serialize};

use adsift_core::types::{KeywordRecord, NegativeRecord, RecommendRecord};

/// Pipeline-state field names.
pub mod keys {
    pub const REPORT_TEXT: &str = "report_text";
    pub const PRODUCT_INFO: &str = "product_info";
    pub const PRODUCT_DESCRIPTION: &str = "product_description";
    pub const SEED_KEYWORDS: &str = "seed_keywords";
    pub const DATA: &str = "data";
    pub const BAD_KEYWORDS: &str = "bad_keywords";
    pub const REMAINING_KEYWORDS: &str = "remaining_keywords";
    pub const SEMANTIC_BAD: &str = "semantic_bad";
    pub const FINAL_NEGATIVE_LIST: &str = "final_negative_list";
    pub const LONGTAIL_KEYWORDS: &str = "longtail_keywords";
    pub const KEYWORD_RECOMMEND: &str = "keyword_recommend";
    pub const NEGATIVE_KEYWORDS: &str = "negative_keywords";
    pub const RECOMMEND_KEYWORDS: &str = "recommend_keywords";
}

// ---- Run entry points ----

/// Full optimization: clean traffic and harvest keywords in one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdOptimizeInput {
    pub report_text: String,
    pub product_info: String,
    #[serde(default)]
    pub seed_keywords: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdOptimizeOutput {
    pub negative_keywords: Vec<NegativeRecord>,
    pub recommend_keywords: Vec<RecommendRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrafficCleanInput {
    pub report_text: String,
    pub product_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficCleanOutput {
    pub final_negative_list: Vec<NegativeRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordHarvestInput {
    pub product_description: String,
    pub seed_keywords: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordHarvestOutput {
    pub keyword_recommend: Vec<RecommendRecord>,
}

// ---- Dispatch ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchInput {
    #[serde(default)]
    pub report_text: String,
    #[serde(default)]
    pub product_info: String,
    #[serde(default)]
    pub seed_keywords: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutput {
    pub report_text: String,
    pub product_info: String,
    pub seed_keywords: String,
}

// ---- Traffic-clean branch ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataPreprocessInput {
    pub report_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPreprocessOutput {
    pub data: Vec<KeywordRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsFilterInput {
    #[serde(default)]
    pub data: Vec<KeywordRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsFilterOutput {
    pub bad_keywords: Vec<NegativeRecord>,
    pub remaining_keywords: Vec<KeywordRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticJudgeInput {
    #[serde(default)]
    pub remaining_keywords: Vec<KeywordRecord>,
    pub product_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticJudgeOutput {
    pub semantic_bad: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeNegativesInput {
    #[serde(default)]
    pub bad_keywords: Vec<NegativeRecord>,
    #[serde(default)]
    pub semantic_bad: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeNegativesOutput {
    pub final_negative_list: Vec<NegativeRecord>,
}

// ---- Keyword-harvest branch ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpandKeywordsInput {
    /// The harvest entry point names this field `product_description`.
    #[serde(default, alias = "product_description")]
    pub product_info: String,
    #[serde(default)]
    pub seed_keywords: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandKeywordsOutput {
    pub longtail_keywords: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetitionScoreInput {
    #[serde(default)]
    pub longtail_keywords: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionScoreOutput {
    pub keyword_recommend: Vec<RecommendRecord>,
}

// ---- Merge ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeResultInput {
    #[serde(default)]
    pub final_negative_list: Vec<NegativeRecord>,
    #[serde(default)]
    pub keyword_recommend: Vec<RecommendRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeResultOutput {
    pub negative_keywords: Vec<NegativeRecord>,
    pub recommend_keywords: Vec<RecommendRecord>,
}
