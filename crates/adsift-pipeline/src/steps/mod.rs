//! The eight processing steps of the optimization pipeline.

pub mod competition_score;
pub mod data_preprocess;
pub mod dispatch;
pub mod expand_keywords;
pub mod llm;
pub mod merge_negatives;
pub mod merge_result;
pub mod semantic_judge;
pub mod stats_filter;

pub use competition_score::CompetitionScore;
pub use data_preprocess::DataPreprocess;
pub use dispatch::Dispatch;
pub use expand_keywords::ExpandKeywords;
pub use llm::{render_template, LlmCall};
pub use merge_negatives::MergeNegatives;
pub use merge_result::MergeResult;
pub use semantic_judge::SemanticJudge;
pub use stats_filter::StatsFilter;
