//! # repograph-core
//!
//! Core engine for Repograph: build a queryable knowledge representation of
//! a source repository and retrieve from it by meaning as well as by name.
//!
//! ## Pipeline
//!
//! 1. **Scan** ([`scanner`]) - walk the repository tree, yielding
//!    directories before their contents with normalized relative paths.
//! 2. **Extract** ([`lang`]) - per recognized source kind, turn file
//!    content into entity name lists (full parse for Python, pattern
//!    heuristics for JavaScript and CSS).
//! 3. **Store** ([`builder`]) - upsert directories, files, entities, and
//!    their typed relationships into the graph store.
//! 4. **Index** ([`indexer`]) - per entity kind, embed every stored name
//!    and persist a flat exact-L2 index paired with its name list.
//! 5. **Retrieve** ([`retrieval`]) - merge a case-insensitive graph
//!    substring match with per-kind vector search into one labeled context
//!    block for a downstream generation collaborator.
//!
//! ## Example
//!
//! ```ignore
//! use repograph_core::{build_graph, build_indexes, retrieve};
//! use repograph_db::GraphStore;
//!
//! let mut store = GraphStore::open(".repograph/graph")?;
//! let summary = build_graph(std::path::Path::new("."), &mut store)?;
//! store.flush()?;
//!
//! let model = repograph_model::create_embedding_model(&Default::default())?;
//! build_indexes(&store, model.as_ref(), std::path::Path::new(".repograph/index"));
//!
//! let context = retrieve(&store, model.as_ref(), std::path::Path::new(".repograph/index"), "parse", 3);
//! println!("{}", context.render());
//! ```

pub mod builder;
pub mod config;
pub mod constants;
pub mod errors;
pub mod indexer;
pub mod lang;
pub mod retrieval;
pub mod scanner;
pub mod testing;

// Re-exports for convenience
pub use builder::{build_graph, BuildSummary};
pub use config::{default_config_path, EmbeddingSettings, RepographConfig, RetrievalSettings};
pub use constants::{graph_dir, index_root, should_ignore_dir, DATA_DIR};
pub use errors::RepographError;
pub use indexer::{build_indexes, index_dir_for_kind, IndexReport, EMBEDDED_KINDS};
pub use lang::{kind_for_path, SourceKind};
pub use retrieval::{
    retrieve, KindMatches, RetrievedContext, VectorHit, VectorSection, DEFAULT_TOP_K,
    GRAPH_MATCH_KINDS,
};
pub use scanner::{scan_repository, ScanEntry};
