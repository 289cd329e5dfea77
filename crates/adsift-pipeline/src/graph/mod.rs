//! Step graph engine: typed steps wired into a DAG with explicit fan-out and
//! fan-in points.
//!
//! A `Node` wraps a `Step` and declares the state fields it reads and owns.
//! `GraphBuilder` validates the wiring (acyclic, reachable, disjoint outputs,
//! reads satisfied by ancestors) and produces a `GraphExecutor`, which runs
//! ready nodes concurrently and fires each join node once all of its
//! predecessors have completed.

pub mod builder;
pub mod edge;
pub mod executor;
pub mod node;
pub mod state;

pub use builder::GraphBuilder;
pub use edge::Edge;
pub use executor::{ExecutionResult, GraphExecutor, NodeResult};
pub use node::{Node, Step};
pub use state::PipelineState;
