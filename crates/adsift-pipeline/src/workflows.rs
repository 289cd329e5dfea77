//! The three runnable graphs: full optimization, traffic cleaning, and
//! keyword harvesting.

use std::sync::Arc;

use adsift_core::config::AppConfig;
use adsift_core::error::Result;
use adsift_core::traits::TextGenerator;

use crate::contracts::keys::*;
use crate::graph::{Edge, GraphBuilder, GraphExecutor, Node};
use crate::steps::{
    CompetitionScore, DataPreprocess, Dispatch, ExpandKeywords, MergeNegatives, MergeResult,
    SemanticJudge, StatsFilter,
};

pub const DISPATCH: &str = "dispatch";
pub const DATA_PREPROCESS: &str = "data_preprocess";
pub const STATS_FILTER: &str = "stats_filter";
pub const SEMANTIC_JUDGE: &str = "semantic_judge";
pub const MERGE_NEGATIVES: &str = "merge_negatives";
pub const EXPAND_KEYWORDS: &str = "expand_keywords";
pub const COMPETITION_SCORE: &str = "competition_score";
pub const MERGE_RESULT: &str = "merge_result";

/// Traffic-clean branch: report → records → statistical + semantic negatives.
fn traffic_clean_nodes(generator: &Arc<dyn TextGenerator>, config: &AppConfig) -> Vec<Node> {
    vec![
        Node::new(DATA_PREPROCESS, "Data preprocess", DataPreprocess)
            .with_inputs(&[REPORT_TEXT])
            .with_outputs(&[DATA]),
        Node::new(STATS_FILTER, "Statistical filter", StatsFilter::new(&config.pipeline))
            .with_inputs(&[DATA])
            .with_outputs(&[BAD_KEYWORDS, REMAINING_KEYWORDS]),
        Node::new(
            SEMANTIC_JUDGE,
            "Semantic relevance judge",
            SemanticJudge::new(
                generator.clone(),
                config.prompts.semantic_judge.clone(),
                &config.model.model_id,
            ),
        )
        .with_inputs(&[REMAINING_KEYWORDS, PRODUCT_INFO])
        .with_outputs(&[SEMANTIC_BAD]),
        Node::new(MERGE_NEGATIVES, "Merge negatives", MergeNegatives)
            .with_inputs(&[BAD_KEYWORDS, SEMANTIC_BAD])
            .with_outputs(&[FINAL_NEGATIVE_LIST]),
    ]
}

fn traffic_clean_edges() -> Vec<Edge> {
    vec![
        Edge::new(DATA_PREPROCESS, STATS_FILTER),
        Edge::new(STATS_FILTER, SEMANTIC_JUDGE),
        Edge::new(SEMANTIC_JUDGE, MERGE_NEGATIVES),
    ]
}

fn expand_keywords_node(
    generator: &Arc<dyn TextGenerator>,
    config: &AppConfig,
    product_key: &str,
) -> Node {
    Node::new(
        EXPAND_KEYWORDS,
        "Long-tail keyword expansion",
        ExpandKeywords::new(
            generator.clone(),
            config.prompts.expand_keywords.clone(),
            &config.model.model_id,
        ),
    )
    .with_inputs(&[product_key, SEED_KEYWORDS])
    .with_outputs(&[LONGTAIL_KEYWORDS])
}

fn competition_score_node() -> Node {
    Node::new(COMPETITION_SCORE, "Competition score", CompetitionScore)
        .with_inputs(&[LONGTAIL_KEYWORDS])
        .with_outputs(&[KEYWORD_RECOMMEND])
}

/// Full optimization graph.
///
/// ```text
/// dispatch ─┬─ data_preprocess → stats_filter → semantic_judge → merge_negatives ─┬─ merge_result
///           └─ expand_keywords → competition_score ──────────────────────────────┘
/// ```
pub fn ad_optimize_graph(
    generator: Arc<dyn TextGenerator>,
    config: &AppConfig,
) -> Result<GraphExecutor> {
    let mut builder = GraphBuilder::new("ad_optimize")
        .inputs(&[REPORT_TEXT, PRODUCT_INFO, SEED_KEYWORDS])
        .outputs(&[NEGATIVE_KEYWORDS, RECOMMEND_KEYWORDS])
        .node(
            Node::new(DISPATCH, "Dispatch", Dispatch)
                .with_inputs(&[REPORT_TEXT, PRODUCT_INFO, SEED_KEYWORDS])
                .with_outputs(&[REPORT_TEXT, PRODUCT_INFO, SEED_KEYWORDS]),
        );
    for node in traffic_clean_nodes(&generator, config) {
        builder = builder.node(node);
    }
    builder
        .node(expand_keywords_node(&generator, config, PRODUCT_INFO))
        .node(competition_score_node())
        .node(
            Node::new(MERGE_RESULT, "Merge result", MergeResult)
                .with_inputs(&[FINAL_NEGATIVE_LIST, KEYWORD_RECOMMEND])
                .with_outputs(&[NEGATIVE_KEYWORDS, RECOMMEND_KEYWORDS]),
        )
        .edges(Edge::fan_out(DISPATCH, [DATA_PREPROCESS, EXPAND_KEYWORDS]))
        .edges(traffic_clean_edges())
        .edge(EXPAND_KEYWORDS, COMPETITION_SCORE)
        .edges(Edge::join([MERGE_NEGATIVES, COMPETITION_SCORE], MERGE_RESULT))
        .entry(DISPATCH)
        .finish(MERGE_RESULT)
        .build()
}

/// Traffic-clean graph: negatives only.
pub fn traffic_clean_graph(
    generator: Arc<dyn TextGenerator>,
    config: &AppConfig,
) -> Result<GraphExecutor> {
    let mut builder = GraphBuilder::new("traffic_clean")
        .inputs(&[REPORT_TEXT, PRODUCT_INFO])
        .outputs(&[FINAL_NEGATIVE_LIST]);
    for node in traffic_clean_nodes(&generator, config) {
        builder = builder.node(node);
    }
    builder
        .edges(traffic_clean_edges())
        .entry(DATA_PREPROCESS)
        .finish(MERGE_NEGATIVES)
        .build()
}

/// Keyword-harvest graph: expansion and scoring only.
pub fn keyword_harvest_graph(
    generator: Arc<dyn TextGenerator>,
    config: &AppConfig,
) -> Result<GraphExecutor> {
    GraphBuilder::new("keyword_harvest")
        .inputs(&[PRODUCT_DESCRIPTION, SEED_KEYWORDS])
        .outputs(&[KEYWORD_RECOMMEND])
        .node(expand_keywords_node(&generator, config, PRODUCT_DESCRIPTION))
        .node(competition_score_node())
        .edge(EXPAND_KEYWORDS, COMPETITION_SCORE)
        .entry(EXPAND_KEYWORDS)
        .finish(COMPETITION_SCORE)
        .build()
}
