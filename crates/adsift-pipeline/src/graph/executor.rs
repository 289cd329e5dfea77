use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use adsift_core::error::{AdsiftError, Result};
use adsift_core::types::RunId;

use super::node::Node;
use super::state::PipelineState;

/// Result of executing a single node.
#[derive(Debug, Clone)]
pub struct NodeResult {
    /// Which node was executed.
    pub node_id: String,
    /// Execution time in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of executing an entire graph.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    /// Per-node results in completion order.
    pub node_results: Vec<NodeResult>,
    /// The final state with every field produced during the run.
    pub state: PipelineState,
    /// The state restricted to the graph's declared output fields.
    pub output: Map<String, Value>,
    /// Total execution time in milliseconds.
    pub total_elapsed_ms: u64,
}

impl ExecutionResult {
    /// Decode the output fields into the caller-facing result contract.
    pub fn output_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.output.clone()))?)
    }

    /// Position of a node in completion order, if it ran.
    pub fn completion_index(&self, node_id: &str) -> Option<usize> {
        self.node_results.iter().position(|r| r.node_id == node_id)
    }
}

type TaskOutcome = (String, Result<Map<String, Value>>, u64);

/// Executes a validated step DAG.
///
/// Nodes are scheduled by dependency counting: a node is spawned onto the
/// runtime once its last predecessor completes, so independent branches run
/// concurrently and a join node runs exactly once, after the slowest branch.
/// Built with `GraphBuilder`.
#[derive(Debug)]
pub struct GraphExecutor {
    pub(super) name: String,
    pub(super) nodes: HashMap<String, Arc<Node>>,
    pub(super) successors: HashMap<String, Vec<String>>,
    pub(super) predecessor_counts: HashMap<String, usize>,
    pub(super) order: Vec<String>,
    pub(super) entry: String,
    pub(super) finish: Vec<String>,
    pub(super) input_keys: Vec<String>,
    pub(super) output_keys: Vec<String>,
}

impl GraphExecutor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn input_keys(&self) -> &[String] {
        &self.input_keys
    }

    pub fn output_keys(&self) -> &[String] {
        &self.output_keys
    }

    /// A dependency-respecting order of all node ids.
    pub fn topological_order(&self) -> &[String] {
        &self.order
    }

    pub fn predecessor_count(&self, id: &str) -> usize {
        self.predecessor_counts.get(id).copied().unwrap_or(0)
    }

    /// Execute the graph from its entry node.
    ///
    /// The first failing node aborts the run: in-flight branches are
    /// cancelled and the error is returned with the failing node's id.
    pub async fn execute(&self, initial_state: PipelineState) -> Result<ExecutionResult> {
        let run_id = RunId::new();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(run_id = %run_id, graph = %self.name, nodes = self.nodes.len(), "Starting graph run");

        let mut state = initial_state;
        let mut pending = self.predecessor_counts.clone();
        let mut node_results = Vec::with_capacity(self.nodes.len());
        // Dropping the set on an early return aborts every in-flight node.
        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();

        self.spawn_node(&mut tasks, &run_id, &self.entry, &state)?;

        while let Some(joined) = tasks.join_next().await {
            let (node_id, outcome, elapsed_ms) =
                joined.map_err(|e| AdsiftError::TaskJoin(e.to_string()))?;

            let output = match outcome {
                Ok(output) => output,
                Err(e) => {
                    error!(run_id = %run_id, node_id = %node_id, error = %e, "Graph node failed, aborting run");
                    tasks.abort_all();
                    return Err(e.in_step(node_id));
                }
            };

            info!(run_id = %run_id, node_id = %node_id, elapsed_ms, "Node complete");
            state.apply(output);
            node_results.push(NodeResult {
                node_id: node_id.clone(),
                elapsed_ms,
            });

            for next in self.successors.get(&node_id).into_iter().flatten() {
                let remaining = pending
                    .get_mut(next)
                    .ok_or_else(|| AdsiftError::Graph(format!("unknown node '{}'", next)))?;
                *remaining -= 1;
                if *remaining == 0 {
                    self.spawn_node(&mut tasks, &run_id, next, &state)?;
                } else {
                    debug!(
                        run_id = %run_id,
                        node_id = %next,
                        waiting_on = *remaining,
                        "Join node waiting for predecessors"
                    );
                }
            }
        }

        if let Some(unfinished) = self
            .finish
            .iter()
            .find(|id| !node_results.iter().any(|r| &r.node_id == *id))
        {
            return Err(AdsiftError::Graph(format!(
                "{}: finish node '{}' never ran",
                self.name, unfinished
            )));
        }

        let output = state.snapshot(&self.output_keys);
        let total_elapsed_ms = start.elapsed().as_millis() as u64;
        info!(run_id = %run_id, graph = %self.name, total_elapsed_ms, "Graph run complete");

        Ok(ExecutionResult {
            run_id,
            started_at,
            node_results,
            state,
            output,
            total_elapsed_ms,
        })
    }

    /// Spawn a node with a snapshot of just its declared input fields.
    fn spawn_node(
        &self,
        tasks: &mut JoinSet<TaskOutcome>,
        run_id: &RunId,
        node_id: &str,
        state: &PipelineState,
    ) -> Result<()> {
        let node = self
            .nodes
            .get(node_id)
            .cloned()
            .ok_or_else(|| AdsiftError::Graph(format!("Node '{}' not found in graph", node_id)))?;
        let snapshot = state.snapshot(&node.input_keys);

        info!(run_id = %run_id, node_id = %node.id, node_name = %node.name, "Executing graph node");

        tasks.spawn(async move {
            let node_start = Instant::now();
            let outcome = node.invoke(snapshot).await;
            let elapsed_ms = node_start.elapsed().as_millis() as u64;
            (node.id.clone(), outcome, elapsed_ms)
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, GraphBuilder, Step};
    use futures::future::BoxFuture;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Deserialize)]
    struct NumIn {
        #[serde(default)]
        x: i64,
    }

    /// Adds a constant after an optional delay, writing to a configurable field.
    struct AddStep {
        field: &'static str,
        add: i64,
        delay_ms: u64,
        fail: bool,
    }

    impl Step for AddStep {
        type Input = NumIn;
        type Output = Map<String, Value>;

        fn run(&self, input: NumIn) -> BoxFuture<'_, Result<Self::Output>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
                if self.fail {
                    return Err(AdsiftError::LlmRequest("boom".into()));
                }
                let mut out = Map::new();
                out.insert(self.field.to_string(), Value::from(input.x + self.add));
                Ok(out)
            })
        }
    }

    #[derive(Deserialize)]
    struct SumIn {
        left: i64,
        right: i64,
    }

    #[derive(Serialize)]
    struct SumOut {
        total: i64,
    }

    struct Sum;

    impl Step for Sum {
        type Input = SumIn;
        type Output = SumOut;

        fn run(&self, input: SumIn) -> BoxFuture<'_, Result<SumOut>> {
            Box::pin(async move {
                Ok(SumOut {
                    total: input.left + input.right,
                })
            })
        }
    }

    fn add(field: &'static str, add: i64, delay_ms: u64, fail: bool) -> AddStep {
        AddStep {
            field,
            add,
            delay_ms,
            fail,
        }
    }

    fn input(x: i64) -> PipelineState {
        PipelineState::from_serializable(&serde_json::json!({ "x": x })).unwrap()
    }

    fn well_formed(left_delay: u64, right_delay: u64, right_fails: bool) -> GraphExecutor {
        GraphBuilder::new("fork-join")
            .inputs(&["x"])
            .node(
                Node::new("start", "Start", add("start_x", 0, 0, false))
                    .with_inputs(&["x"])
                    .with_outputs(&["start_x"]),
            )
            .node(
                Node::new("left", "Left", add("left", 1, left_delay, false))
                    .with_inputs(&["x"])
                    .with_outputs(&["left"]),
            )
            .node(
                Node::new("right", "Right", add("right", 100, right_delay, right_fails))
                    .with_inputs(&["x"])
                    .with_outputs(&["right"]),
            )
            .node(
                Node::new("sum", "Sum", Sum)
                    .with_inputs(&["left", "right"])
                    .with_outputs(&["total"]),
            )
            .edges(Edge::fan_out("start", ["left", "right"]))
            .edges(Edge::join(["left", "right"], "sum"))
            .entry("start")
            .finish("sum")
            .outputs(&["total"])
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_join_waits_for_slowest_branch() {
        let graph = well_formed(5, 60, false);
        let result = graph.execute(input(1)).await.unwrap();

        assert_eq!(result.output.get("total"), Some(&Value::from(103)));
        assert_eq!(result.node_results.len(), 4);
        assert_eq!(result.completion_index("start"), Some(0));
        assert!(result.completion_index("left") < result.completion_index("right"));
        assert_eq!(result.completion_index("sum"), Some(3));
    }

    #[tokio::test]
    async fn test_completion_order_does_not_change_output() {
        let fast_left = well_formed(0, 40, false).execute(input(7)).await.unwrap();
        let fast_right = well_formed(40, 0, false).execute(input(7)).await.unwrap();
        assert_eq!(fast_left.output, fast_right.output);
        assert!(fast_right.completion_index("right") < fast_right.completion_index("left"));
    }

    #[tokio::test]
    async fn test_branches_run_concurrently() {
        let result = well_formed(200, 200, false).execute(input(0)).await.unwrap();
        let elapsed = |id: &str| {
            result
                .node_results
                .iter()
                .find(|r| r.node_id == id)
                .map(|r| r.elapsed_ms)
                .unwrap()
        };
        // Run back to back, the branches would take at least their summed time.
        let branches = elapsed("left") + elapsed("right");
        assert!(elapsed("left") >= 200 && elapsed("right") >= 200);
        assert!(result.total_elapsed_ms < branches, "{} >= {}", result.total_elapsed_ms, branches);
    }

    #[tokio::test]
    async fn test_failure_aborts_run() {
        let graph = well_formed(200, 0, true);
        let err = graph.execute(input(1)).await.unwrap_err();
        assert_eq!(err.failed_step(), Some("right"));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_output_filtered_to_contract() {
        let result = well_formed(0, 0, false).execute(input(2)).await.unwrap();
        assert_eq!(result.output.len(), 1);
        assert!(result.state.contains("left"));
        assert!(result.state.contains("start_x"));

        #[derive(Deserialize)]
        struct Final {
            total: i64,
        }
        let decoded: Final = result.output_as().unwrap();
        assert_eq!(decoded.total, 105);
    }
}
