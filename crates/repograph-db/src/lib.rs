//! # repograph-db
//!
//! Storage layer for Repograph - graph persistence and vector index bundles.
//!
//! This crate provides:
//!
//! - **Graph store**: typed nodes and directed relationships with idempotent
//!   upsert semantics, backed by JSONL files
//! - **Flat vector index**: exact L2 nearest-neighbor search over embedding
//!   rows, persisted together with its parallel name list as one bundle
//!
//! ## Design Principles
//!
//! 1. **Upserts everywhere**: repeating any write with identical arguments
//!    never creates duplicates, so a full rebuild is always safe.
//! 2. **Exact search**: the vector index is a flat exhaustive scan. The
//!    per-kind corpora are small; result quality wins over query latency.
//! 3. **Paired artifacts**: an index is only usable together with its name
//!    list. Loading one without the other is an error, never a guess.

pub mod error;
pub mod graph;
pub mod vector;

pub use error::{DbError, DbResult};
pub use graph::{GraphEdge, GraphNode, GraphStats, GraphStore, NodeKind, NodeRef, RelKind};
pub use vector::{FlatL2Index, FlatSearchHit, IndexBundle, IndexMeta};
