use futures::future::BoxFuture;
use tracing::debug;

use adsift_core::config::PipelineConfig;
use adsift_core::error::Result;
use adsift_core::types::{KeywordRecord, NegativeRecord};

use crate::contracts::{StatsFilterInput, StatsFilterOutput};
use crate::graph::Step;

pub const REASON_HIGH_CLICKS: &str = "high clicks, zero conversions";
pub const REASON_HIGH_SPEND: &str = "high spend, zero conversions";

/// Zero-order terms with more clicks than this are flagged.
pub const CLICK_THRESHOLD: u64 = 10;

/// Flags money-losing terms with hard statistical rules.
pub struct StatsFilter {
    reference_average_price: f64,
}

impl StatsFilter {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            reference_average_price: config.reference_average_price,
        }
    }
}

impl Step for StatsFilter {
    type Input = StatsFilterInput;
    type Output = StatsFilterOutput;

    fn run(&self, input: StatsFilterInput) -> BoxFuture<'_, Result<StatsFilterOutput>> {
        Box::pin(async move {
            let out = partition(input.data, self.reference_average_price);
            debug!(
                flagged = out.bad_keywords.len(),
                remaining = out.remaining_keywords.len(),
                "Applied statistical filter"
            );
            Ok(out)
        })
    }
}

/// The rule that flags a record, if any.
pub fn flag_reason(record: &KeywordRecord, reference_average_price: f64) -> Option<&'static str> {
    if record.orders != 0 {
        return None;
    }
    if record.clicks > CLICK_THRESHOLD {
        Some(REASON_HIGH_CLICKS)
    } else if record.spend > reference_average_price / 2.0 {
        Some(REASON_HIGH_SPEND)
    } else {
        None
    }
}

/// Split records into flagged and remaining, both in input order.
pub fn partition(records: Vec<KeywordRecord>, reference_average_price: f64) -> StatsFilterOutput {
    let mut out = StatsFilterOutput::default();
    for record in records {
        match flag_reason(&record, reference_average_price) {
            Some(reason) => out.bad_keywords.push(NegativeRecord::flagged(record, reason)),
            None => out.remaining_keywords.push(record),
        }
    }
    out
}
