use futures::future::BoxFuture;
use tracing::debug;

use adsift_core::error::Result;
use adsift_core::types::{Bid, MatchType, RecommendRecord};

use crate::contracts::{CompetitionScoreInput, CompetitionScoreOutput};
use crate::graph::Step;

pub const COMPETITION_LOW: &str = "low-competition / blue ocean";
pub const COMPETITION_HIGH: &str = "high-competition / red ocean";
pub const COMPETITION_MEDIUM: &str = "medium competition";

/// Grades candidate keywords by length and scenario cues and suggests bids.
pub struct CompetitionScore;

impl Step for CompetitionScore {
    type Input = CompetitionScoreInput;
    type Output = CompetitionScoreOutput;

    fn run(&self, input: CompetitionScoreInput) -> BoxFuture<'_, Result<CompetitionScoreOutput>> {
        Box::pin(async move {
            let keyword_recommend = score_keywords(&input.longtail_keywords);
            debug!(scored = keyword_recommend.len(), "Scored keyword candidates");
            Ok(CompetitionScoreOutput { keyword_recommend })
        })
    }
}

/// One recommendation per non-blank line, in input order.
pub fn score_keywords(text: &str) -> Vec<RecommendRecord> {
    text.lines().filter_map(classify).collect()
}

/// Remove one leading list ordinal such as `1.` or `12)`.
pub fn strip_ordinal(line: &str) -> &str {
    let line = line.trim();
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    match line[digits..].chars().next() {
        Some('.') | Some(')') => line[digits + 1..].trim_start(),
        _ => line,
    }
}

/// Classify one line. Returns `None` for lines that are empty once the
/// ordinal is stripped.
pub fn classify(line: &str) -> Option<RecommendRecord> {
    let keyword = strip_ordinal(line);
    if keyword.is_empty() {
        return None;
    }

    let word_count = keyword.split_whitespace().count();
    let lowered = keyword.to_lowercase();
    let has_scenario_cue = lowered.contains("for") || lowered.contains("with");

    let (competition, match_type, bid, reason) = if word_count >= 3 && has_scenario_cue {
        (
            COMPETITION_LOW,
            MatchType::Exact,
            Bid::High,
            "long-tail + precise scenario, high conversion",
        )
    } else if word_count <= 2 {
        (
            COMPETITION_HIGH,
            MatchType::Broad,
            Bid::Low,
            "broad term, intense competition",
        )
    } else {
        (COMPETITION_MEDIUM, MatchType::Phrase, Bid::Medium, "worth testing")
    };

    Some(RecommendRecord {
        keyword: keyword.to_string(),
        match_type,
        competition: competition.to_string(),
        bid,
        reason: reason.to_string(),
    })
}
