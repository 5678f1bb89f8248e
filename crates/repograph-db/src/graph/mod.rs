//! Typed code graph: entities, relationships, and the JSONL-backed store.
//!
//! The graph models a source repository as nodes keyed by `(kind, name)`
//! connected by directed, typed relationships. All writes are upserts:
//! rebuilding the graph from an unchanged tree is a no-op beyond timestamp
//! touches.

mod entities;
mod store;

pub use entities::{GraphEdge, GraphNode, GraphStats, NodeKind, NodeRef, RelKind};
pub use store::{GraphStore, EDGES_FILENAME, NODES_FILENAME};
