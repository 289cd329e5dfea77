//! Ad optimization pipeline.
//!
//! Two branches run concurrently from one request: traffic cleaning turns a
//! search-term report into negative keywords, keyword harvesting turns a
//! product description into scored long-tail keywords. `Pipeline` runs the
//! full graph or either branch on its own.

pub mod contracts;
pub mod graph;
pub mod steps;
pub mod workflows;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use adsift_core::config::AppConfig;
use adsift_core::error::Result;
use adsift_core::traits::TextGenerator;

pub use contracts::{
    AdOptimizeInput, AdOptimizeOutput, KeywordHarvestInput, KeywordHarvestOutput,
    TrafficCleanInput, TrafficCleanOutput,
};
pub use graph::{ExecutionResult, GraphExecutor, PipelineState};

/// Entry point for the three workflows.
///
/// Graphs are validated once at construction; each run gets fresh state.
pub struct Pipeline {
    ad_optimize: GraphExecutor,
    traffic_clean: GraphExecutor,
    keyword_harvest: GraphExecutor,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            ad_optimize: workflows::ad_optimize_graph(generator.clone(), config)?,
            traffic_clean: workflows::traffic_clean_graph(generator.clone(), config)?,
            keyword_harvest: workflows::keyword_harvest_graph(generator, config)?,
        })
    }

    /// Clean traffic and harvest keywords in one run.
    pub async fn optimize(&self, input: AdOptimizeInput) -> Result<AdOptimizeOutput> {
        run_typed(&self.ad_optimize, &input).await
    }

    /// Produce the final negative keyword list only.
    pub async fn traffic_clean(&self, input: TrafficCleanInput) -> Result<TrafficCleanOutput> {
        run_typed(&self.traffic_clean, &input).await
    }

    /// Produce scored keyword recommendations only.
    pub async fn keyword_harvest(&self, input: KeywordHarvestInput) -> Result<KeywordHarvestOutput> {
        run_typed(&self.keyword_harvest, &input).await
    }

    /// Run the full graph and keep the execution details.
    pub async fn optimize_detailed(&self, input: AdOptimizeInput) -> Result<ExecutionResult> {
        self.ad_optimize
            .execute(PipelineState::from_serializable(&input)?)
            .await
    }
}

async fn run_typed<I, O>(graph: &GraphExecutor, input: &I) -> Result<O>
where
    I: Serialize,
    O: DeserializeOwned,
{
    let result = graph.execute(PipelineState::from_serializable(input)?).await?;
    info!(
        run_id = %result.run_id,
        graph = graph.name(),
        steps = result.node_results.len(),
        total_elapsed_ms = result.total_elapsed_ms,
        "Workflow finished"
    );
    result.output_as()
}
