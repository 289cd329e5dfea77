use futures::future::BoxFuture;
use tracing::debug;

use adsift_core::error::Result;
use adsift_core::types::KeywordRecord;

use crate::contracts::{DataPreprocessInput, DataPreprocessOutput};
use crate::graph::Step;

/// Parses the pasted search-term report into keyword records.
pub struct DataPreprocess;

impl Step for DataPreprocess {
    type Input = DataPreprocessInput;
    type Output = DataPreprocessOutput;

    fn run(&self, input: DataPreprocessInput) -> BoxFuture<'_, Result<DataPreprocessOutput>> {
        Box::pin(async move {
            let data = parse_report(&input.report_text);
            debug!(records = data.len(), "Parsed search-term report");
            Ok(DataPreprocessOutput { data })
        })
    }
}

/// Parse every well-formed line of a report, in order.
///
/// Lines that do not parse are skipped without error.
pub fn parse_report(text: &str) -> Vec<KeywordRecord> {
    text.lines().filter_map(parse_line).collect()
}

/// Parse `<search term...> <clicks> <spend> <orders>`.
///
/// The last three whitespace-separated tokens are the numbers; everything
/// before them, re-joined with single spaces, is the search term.
pub fn parse_line(line: &str) -> Option<KeywordRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }
    let (term, numbers) = parts.split_at(parts.len() - 3);

    let clicks = numbers[0].parse::<u64>().ok()?;
    let spend = numbers[1]
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)?;
    let orders = numbers[2].parse::<u64>().ok()?;

    Some(KeywordRecord::new(term.join(" "), clicks, spend, orders))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_line() {
        let rec = parse_line("yoga mat thick 15 12.50 2").unwrap();
        assert_eq!(rec, KeywordRecord::new("yoga mat thick", 15, 12.5, 2));
    }

    #[test]
    fn test_whitespace_collapsed_in_term() {
        let rec = parse_line("  blue\t widget   3  2  0 ").unwrap();
        assert_eq!(rec.search_term, "blue widget");
        assert_eq!(rec.spend, 2.0);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        assert!(parse_line("").is_none());
        assert!(parse_line("only 1 2.0").is_none());
        assert!(parse_line("term x 2.0 1").is_none());
        assert!(parse_line("term 1 cheap 1").is_none());
        assert!(parse_line("term 1 2.0 1.5").is_none());
        assert!(parse_line("term -1 2.0 1").is_none());
        assert!(parse_line("term 1 -2.0 1").is_none());
        assert!(parse_line("term 1 NaN 1").is_none());
    }

    #[test]
    fn test_parse_report_keeps_order_and_skips_noise() {
        let report = "Search term Clicks Spend Orders\n\
                      blue widget 15 12.00 0\n\
                      \n\
                      garbage line\n\
                      red widget 3 2.00 1\r\n";
        let data = parse_report(report);
        assert_eq!(
            data,
            vec![
                KeywordRecord::new("blue widget", 15, 12.0, 0),
                KeywordRecord::new("red widget", 3, 2.0, 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_step_output() {
        let out = DataPreprocess
            .run(DataPreprocessInput {
                report_text: "mat 1 0.5 0".into(),
            })
            .await
            .unwrap();
        assert_eq!(out.data.len(), 1);
    }
}
