use futures::future::BoxFuture;

use adsift_core::error::Result;

use crate::contracts::{DispatchInput, DispatchOutput};
use crate::graph::Step;

/// Fans the caller's request out to both branches.
///
/// Pure pass-through; it gives each branch an explicit entry point.
pub struct Dispatch;

impl Step for Dispatch {
    type Input = DispatchInput;
    type Output = DispatchOutput;

    fn run(&self, input: DispatchInput) -> BoxFuture<'_, Result<DispatchOutput>> {
        Box::pin(async move {
            Ok(DispatchOutput {
                report_text: input.report_text,
                product_info: input.product_info,
                seed_keywords: input.seed_keywords,
            })
        })
    }
}
