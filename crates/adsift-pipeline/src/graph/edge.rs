use serde::{Deserialize, Serialize};

/// A dependency edge: `to` may not start before `from` has completed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Fan-in edges: `to` waits for every node in `from`.
    pub fn join<I, S>(from: I, to: impl Into<String>) -> Vec<Edge>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let to = to.into();
        from.into_iter().map(|f| Edge::new(f, to.clone())).collect()
    }

    /// Fan-out edges: every node in `to` starts once `from` completes.
    pub fn fan_out<I, S>(from: impl Into<String>, to: I) -> Vec<Edge>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let from = from.into();
        to.into_iter().map(|t| Edge::new(from.clone(), t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_builders() {
        let e = Edge::new("a", "b");
        assert_eq!(e.from, "a");
        assert_eq!(e.to, "b");

        let joins = Edge::join(["left", "right"], "merge");
        assert_eq!(
            joins,
            vec![Edge::new("left", "merge"), Edge::new("right", "merge")]
        );

        let outs = Edge::fan_out("dispatch", ["x", "y"]);
        assert_eq!(outs.len(), 2);
        assert!(outs.iter().all(|e| e.from == "dispatch"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let edge = Edge::new("stats_filter", "semantic_judge");
        let json = serde_json::to_string(&edge).unwrap();
        let parsed: Edge = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, edge);
    }
}
