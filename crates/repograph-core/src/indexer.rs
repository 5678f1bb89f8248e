//! Per-kind embedding index builds.
//!
//! For each embedded kind (Function, Variable, File) the indexer reads the
//! entity names from the graph store in insertion order, embeds them as one
//! batch, builds a flat exact-L2 index whose row order matches the name
//! order, and persists the bundle, replacing any previous one wholesale.
//!
//! Kinds are isolated: an empty name list or an embedding failure fails
//! that kind's index only, and the remaining kinds proceed.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use repograph_db::{FlatL2Index, GraphStore, IndexBundle, NodeKind};
use repograph_model::EmbeddingModel;

use crate::errors::RepographError;

/// The entity kinds that get a semantic index.
pub const EMBEDDED_KINDS: &[NodeKind] = &[NodeKind::Function, NodeKind::Variable, NodeKind::File];

/// Bundle directory for one kind under the index root.
pub fn index_dir_for_kind(index_root: &Path, kind: NodeKind) -> PathBuf {
    index_root.join(kind.tag())
}

// ============================================================================
// IndexReport
// ============================================================================

/// A successfully built per-kind index.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    /// The entity kind.
    pub kind: NodeKind,

    /// Number of rows (= distinct entity names) indexed.
    pub rows: usize,
}

/// A per-kind index that could not be built.
#[derive(Debug, Clone)]
pub struct FailedIndex {
    /// The entity kind.
    pub kind: NodeKind,

    /// Why the build failed.
    pub reason: String,
}

/// Outcome of one index-build run across all embedded kinds.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    /// Kinds whose bundle was written.
    pub built: Vec<BuiltIndex>,

    /// Kinds that failed, with reasons.
    pub failed: Vec<FailedIndex>,
}

impl IndexReport {
    /// Whether every embedded kind was indexed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// ============================================================================
// Build
// ============================================================================

/// Build the index bundle for every embedded kind.
///
/// Never fails as a whole: per-kind failures are collected in the report.
pub fn build_indexes(
    store: &GraphStore,
    model: &dyn EmbeddingModel,
    index_root: &Path,
) -> IndexReport {
    let mut report = IndexReport::default();

    for &kind in EMBEDDED_KINDS {
        match build_kind_index(store, model, index_root, kind) {
            Ok(rows) => {
                info!("Indexed {} {} names", rows, kind.label());
                report.built.push(BuiltIndex { kind, rows });
            }
            Err(e) => {
                warn!("{} index build failed: {}", kind.label(), e);
                report.failed.push(FailedIndex {
                    kind,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Build and persist one kind's bundle; row order equals name order.
fn build_kind_index(
    store: &GraphStore,
    model: &dyn EmbeddingModel,
    index_root: &Path,
    kind: NodeKind,
) -> Result<usize, RepographError> {
    let names = store.names_of_kind(kind);
    if names.is_empty() {
        return Err(RepographError::NothingToEmbed {
            kind: kind.label().to_string(),
        });
    }

    let vectors = model.embed_batch(&names)?;
    let mut index = FlatL2Index::new(model.dimension());
    index.extend(&vectors)?;

    let bundle = IndexBundle::new(index, names, model.model_id())?;
    bundle.save(&index_dir_for_kind(index_root, kind))?;
    Ok(bundle.len())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::HashEmbedder;
    use tempfile::TempDir;

    fn store_with_entities(temp: &TempDir) -> GraphStore {
        let mut store = GraphStore::open(temp.path().join("graph")).unwrap();
        store.upsert_node(NodeKind::Function, "helper");
        store.upsert_node(NodeKind::Function, "parse_input");
        store.upsert_node(NodeKind::Variable, "count");
        store.upsert_node(NodeKind::File, "src/util.py");
        store
    }

    #[test]
    fn test_build_indexes_all_kinds() {
        let temp = TempDir::new().unwrap();
        let store = store_with_entities(&temp);
        let model = HashEmbedder::new(16);
        let index_root = temp.path().join("index");

        let report = build_indexes(&store, &model, &index_root);

        assert!(report.is_complete());
        assert_eq!(report.built.len(), EMBEDDED_KINDS.len());

        let functions =
            IndexBundle::load(&index_dir_for_kind(&index_root, NodeKind::Function)).unwrap();
        assert_eq!(functions.names, vec!["helper", "parse_input"]);
    }

    #[test]
    fn test_row_order_matches_name_order() {
        let temp = TempDir::new().unwrap();
        let store = store_with_entities(&temp);
        let model = HashEmbedder::new(16);
        let index_root = temp.path().join("index");

        build_indexes(&store, &model, &index_root);

        let bundle =
            IndexBundle::load(&index_dir_for_kind(&index_root, NodeKind::Function)).unwrap();
        // Embedding a stored name again finds its own row at distance ~0.
        let query = model.embed_one("parse_input").unwrap();
        let hits = bundle.search(&query, 1).unwrap();
        assert_eq!(hits[0].0, "parse_input");
        assert!(hits[0].1.abs() < 1e-5);
    }

    #[test]
    fn test_empty_kind_fails_in_isolation() {
        let temp = TempDir::new().unwrap();
        let mut store = GraphStore::open(temp.path().join("graph")).unwrap();
        store.upsert_node(NodeKind::Function, "only_fn");
        // No Variable or File nodes at all.

        let model = HashEmbedder::new(8);
        let index_root = temp.path().join("index");
        let report = build_indexes(&store, &model, &index_root);

        assert_eq!(report.built.len(), 1);
        assert_eq!(report.built[0].kind, NodeKind::Function);
        assert_eq!(report.failed.len(), 2);
        assert!(report
            .failed
            .iter()
            .all(|f| f.reason.contains("to embed")));
    }

    #[test]
    fn test_rebuild_overwrites_wholesale() {
        let temp = TempDir::new().unwrap();
        let mut store = store_with_entities(&temp);
        let model = HashEmbedder::new(8);
        let index_root = temp.path().join("index");

        build_indexes(&store, &model, &index_root);
        store.upsert_node(NodeKind::Function, "added_later");
        build_indexes(&store, &model, &index_root);

        let bundle =
            IndexBundle::load(&index_dir_for_kind(&index_root, NodeKind::Function)).unwrap();
        assert_eq!(bundle.names, vec!["helper", "parse_input", "added_later"]);
    }
}
