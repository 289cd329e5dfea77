use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use adsift_core::error::{AdsiftError, Result};

use super::edge::Edge;
use super::executor::GraphExecutor;
use super::node::Node;

/// Declarative description of a step graph, validated into a `GraphExecutor`.
///
/// Structural defects (cycles, dangling edges, fields written by two nodes,
/// reads of fields no ancestor produces) are rejected here so they cannot
/// surface mid-run.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    name: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    entry: Option<String>,
    finish: Vec<String>,
    input_keys: Vec<String>,
    output_keys: Vec<String>,
}

impl GraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push(Edge::new(from, to));
        self
    }

    pub fn edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        self.edges.extend(edges);
        self
    }

    pub fn entry(mut self, id: impl Into<String>) -> Self {
        self.entry = Some(id.into());
        self
    }

    /// Mark a node as an end step. The run terminates once all end steps finish.
    pub fn finish(mut self, id: impl Into<String>) -> Self {
        self.finish.push(id.into());
        self
    }

    /// Fields the caller supplies at graph entry.
    pub fn inputs(mut self, keys: &[&str]) -> Self {
        self.input_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Fields returned to the caller once the run terminates.
    pub fn outputs(mut self, keys: &[&str]) -> Self {
        self.output_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn build(self) -> Result<GraphExecutor> {
        let invalid = |msg: String| AdsiftError::Graph(format!("{}: {}", self.name, msg));

        let mut nodes: HashMap<String, Arc<Node>> = HashMap::new();
        for node in &self.nodes {
            if nodes.insert(node.id.clone(), Arc::new(node.clone())).is_some() {
                return Err(invalid(format!("duplicate node '{}'", node.id)));
            }
        }

        let entry = self
            .entry
            .clone()
            .ok_or_else(|| invalid("no entry node".into()))?;
        if !nodes.contains_key(&entry) {
            return Err(invalid(format!("entry node '{}' not found", entry)));
        }
        if self.finish.is_empty() {
            return Err(invalid("no finish node".into()));
        }
        for id in &self.finish {
            if !nodes.contains_key(id) {
                return Err(invalid(format!("finish node '{}' not found", id)));
            }
        }

        let mut successors: HashMap<String, Vec<String>> =
            nodes.keys().map(|id| (id.clone(), vec![])).collect();
        let mut predecessors: HashMap<String, Vec<String>> =
            nodes.keys().map(|id| (id.clone(), vec![])).collect();
        let mut seen_edges = HashSet::new();
        for edge in &self.edges {
            for end in [&edge.from, &edge.to] {
                if !nodes.contains_key(end) {
                    return Err(invalid(format!(
                        "edge {} -> {} references unknown node '{}'",
                        edge.from, edge.to, end
                    )));
                }
            }
            if edge.from == edge.to {
                return Err(invalid(format!("self-loop on '{}'", edge.from)));
            }
            if !seen_edges.insert(edge.clone()) {
                return Err(invalid(format!(
                    "duplicate edge {} -> {}",
                    edge.from, edge.to
                )));
            }
            successors.entry(edge.from.clone()).or_default().push(edge.to.clone());
            predecessors.entry(edge.to.clone()).or_default().push(edge.from.clone());
        }

        let order = topological_order(&self.nodes, &predecessors, &successors)
            .ok_or_else(|| invalid("graph contains a cycle".into()))?;

        let reachable = reachable_from(&entry, &successors);
        if let Some(orphan) = self.nodes.iter().find(|n| !reachable.contains(&n.id)) {
            return Err(invalid(format!(
                "node '{}' is not reachable from entry '{}'",
                orphan.id, entry
            )));
        }

        for node in &self.nodes {
            let is_sink = successors[&node.id].is_empty();
            let is_finish = self.finish.contains(&node.id);
            if is_sink != is_finish {
                return Err(invalid(format!(
                    "node '{}' must be a finish node exactly when it has no successors",
                    node.id
                )));
            }
        }

        let mut owners: HashMap<&str, &str> = HashMap::new();
        for node in &self.nodes {
            for key in &node.output_keys {
                if let Some(prev) = owners.insert(key, &node.id) {
                    return Err(invalid(format!(
                        "output field '{}' written by both '{}' and '{}'",
                        key, prev, node.id
                    )));
                }
            }
        }

        // Every read must be satisfied by the caller or by an ancestor; siblings
        // on another branch never count.
        let mut ancestors: HashMap<&str, HashSet<&str>> = HashMap::new();
        for id in &order {
            let mut set = HashSet::new();
            for pred in &predecessors[id] {
                set.insert(pred.as_str());
                if let Some(up) = ancestors.get(pred.as_str()) {
                    set.extend(up.iter().copied());
                }
            }
            ancestors.insert(id.as_str(), set);
        }
        for node in &self.nodes {
            for key in &node.input_keys {
                if self.input_keys.contains(key) {
                    continue;
                }
                let provided = owners
                    .get(key.as_str())
                    .is_some_and(|owner| ancestors[node.id.as_str()].contains(owner));
                if !provided {
                    return Err(invalid(format!(
                        "node '{}' reads '{}' which no ancestor produces",
                        node.id, key
                    )));
                }
            }
        }

        for key in &self.output_keys {
            if !owners.contains_key(key.as_str()) {
                return Err(invalid(format!("graph output '{}' is never produced", key)));
            }
        }

        let predecessor_counts = predecessors
            .iter()
            .map(|(id, preds)| (id.clone(), preds.len()))
            .collect();

        Ok(GraphExecutor {
            name: self.name,
            nodes,
            successors,
            predecessor_counts,
            order,
            entry,
            finish: self.finish,
            input_keys: self.input_keys,
            output_keys: self.output_keys,
        })
    }
}

/// Kahn's algorithm, seeded in declaration order for a stable result.
fn topological_order(
    nodes: &[Node],
    predecessors: &HashMap<String, Vec<String>>,
    successors: &HashMap<String, Vec<String>>,
) -> Option<Vec<String>> {
    let mut in_degree: HashMap<&str, usize> = predecessors
        .iter()
        .map(|(id, preds)| (id.as_str(), preds.len()))
        .collect();
    let mut queue: VecDeque<&str> = nodes
        .iter()
        .filter(|n| in_degree[n.id.as_str()] == 0)
        .map(|n| n.id.as_str())
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(id) = queue.pop_front() {
        order.push(id.to_string());
        for next in &successors[id] {
            if let Some(deg) = in_degree.get_mut(next.as_str()) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(next.as_str());
                }
            }
        }
    }

    (order.len() == nodes.len()).then_some(order)
}

fn reachable_from(entry: &str, successors: &HashMap<String, Vec<String>>) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut stack = vec![entry.to_string()];
    while let Some(id) = stack.pop() {
        if seen.insert(id.clone()) {
            stack.extend(successors[&id].iter().cloned());
        }
    }
    seen
}
