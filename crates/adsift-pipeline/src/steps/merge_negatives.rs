use futures::future::BoxFuture;

use adsift_core::error::Result;
use adsift_core::types::NegativeRecord;

use crate::contracts::{MergeNegativesInput, MergeNegativesOutput};
use crate::graph::Step;

pub const REASON_SEMANTIC_DEFAULT: &str = "semantically unrelated";

/// Combines statistical and semantic negatives into the final list.
///
/// Terms found by both sources appear twice; no deduplication happens here.
pub struct MergeNegatives;

impl Step for MergeNegatives {
    type Input = MergeNegativesInput;
    type Output = MergeNegativesOutput;

    fn run(&self, input: MergeNegativesInput) -> BoxFuture<'_, Result<MergeNegativesOutput>> {
        Box::pin(async move {
            let mut final_negative_list = input.bad_keywords;
            final_negative_list.extend(parse_semantic_bad(&input.semantic_bad));
            Ok(MergeNegativesOutput {
                final_negative_list,
            })
        })
    }
}

/// Parse `search_term | reason` lines into negative records.
///
/// Blank lines are skipped. A line without a pipe, or with nothing after it,
/// gets the default reason. Numbers are zero since no statistics back them.
pub fn parse_semantic_bad(text: &str) -> Vec<NegativeRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (term, reason) = match line.split_once('|') {
                Some((term, reason)) => (term.trim(), reason.trim()),
                None => (line, ""),
            };
            let reason = if reason.is_empty() {
                REASON_SEMANTIC_DEFAULT
            } else {
                reason
            };
            NegativeRecord::semantic(term, reason)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsift_core::types::KeywordRecord;

    #[test]
    fn test_parse_pipe_and_bare_lines() {
        let parsed = parse_semantic_bad(
            "dog bed | wrong category\n\n  phone case  \ncar mat|conflicting material | extra\n",
        );
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], NegativeRecord::semantic("dog bed", "wrong category"));
        assert_eq!(parsed[1], NegativeRecord::semantic("phone case", REASON_SEMANTIC_DEFAULT));
        assert_eq!(
            parsed[2],
            NegativeRecord::semantic("car mat", "conflicting material | extra")
        );
    }

    #[test]
    fn test_empty_reason_gets_default() {
        let parsed = parse_semantic_bad("pool float |   ");
        assert_eq!(parsed[0].reason, REASON_SEMANTIC_DEFAULT);
    }

    #[test]
    fn test_blank_block_yields_nothing() {
        assert!(parse_semantic_bad("").is_empty());
        assert!(parse_semantic_bad("\n   \n\t\n").is_empty());
    }

    #[tokio::test]
    async fn test_merge_keeps_order_and_duplicates() {
        let stat = NegativeRecord::flagged(
            KeywordRecord::new("blue widget", 15, 12.0, 0),
            "high clicks, zero conversions",
        );
        let out = MergeNegatives
            .run(MergeNegativesInput {
                bad_keywords: vec![stat.clone()],
                semantic_bad: "blue widget | off-topic\nred widget".into(),
            })
            .await
            .unwrap();

        let list = out.final_negative_list;
        assert_eq!(list.len(), 1 + 2);
        assert_eq!(list[0], stat);
        assert_eq!(list[1].search_term(), "blue widget");
        assert_eq!(list[1].keyword.clicks, 0);
        assert_eq!(list[2].reason, REASON_SEMANTIC_DEFAULT);
    }
}
