use futures::future::BoxFuture;

use adsift_core::error::Result;

use crate::contracts::{MergeResultInput, MergeResultOutput};
use crate::graph::Step;

/// Joins both branch results into the caller-facing result.
pub struct MergeResult;

impl Step for MergeResult {
    type Input = MergeResultInput;
    type Output = MergeResultOutput;

    fn run(&self, input: MergeResultInput) -> BoxFuture<'_, Result<MergeResultOutput>> {
        Box::pin(async move {
            Ok(MergeResultOutput {
                negative_keywords: input.final_negative_list,
                recommend_keywords: input.keyword_recommend,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsift_core::types::NegativeRecord;

    #[tokio::test]
    async fn test_merge_reshapes() {
        let out = MergeResult
            .run(MergeResultInput {
                final_negative_list: vec![NegativeRecord::semantic("dog bed", "off-topic")],
                keyword_recommend: vec![],
            })
            .await
            .unwrap();
        assert_eq!(out.negative_keywords.len(), 1);
        assert!(out.recommend_keywords.is_empty());
    }
}
