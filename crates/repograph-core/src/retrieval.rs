//! Retrieval engine: graph substring match merged with per-kind vector
//! search.
//!
//! Given a free-text query, retrieval performs:
//!
//! 1. **Graph match** - a case-insensitive substring filter over the names
//!    of Function, Variable, File, and Configuration nodes. All matches are
//!    returned, unscored; this is a recall filter, not a ranked search.
//! 2. **Vector match** - for each embedded kind, the query is embedded with
//!    the same model used at index-build time and run as a top-`k` L2
//!    search against that kind's persisted bundle; row ids translate to
//!    names by position.
//!
//! The merge is concatenation: the graph section first, then one section
//! per embedded kind. No score fusion across the two sources is attempted.
//! A kind whose bundle is missing or unreadable degrades to an explicit
//! error marker in its section; the other kinds and the graph match are
//! unaffected. Retrieval mutates nothing.

use std::path::Path;

use tracing::debug;

use repograph_db::{GraphStore, IndexBundle, NodeKind};
use repograph_model::EmbeddingModel;

use crate::indexer::{index_dir_for_kind, EMBEDDED_KINDS};

/// Node kinds covered by the graph substring match.
pub const GRAPH_MATCH_KINDS: &[NodeKind] = &[
    NodeKind::Function,
    NodeKind::Variable,
    NodeKind::File,
    NodeKind::Configuration,
];

/// Default per-kind result count for vector search.
pub const DEFAULT_TOP_K: usize = 3;

// ============================================================================
// Result types
// ============================================================================

/// One vector-search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    /// Matched entity name.
    pub name: String,

    /// Euclidean distance to the query embedding. Lower is better.
    pub distance: f32,
}

/// Vector matches for one kind: hits, or an explicit failure marker.
#[derive(Debug, Clone, PartialEq)]
pub enum KindMatches {
    /// Ranked hits, nearest first.
    Hits(Vec<VectorHit>),

    /// The kind's index could not be used; the reason is surfaced verbatim.
    Error(String),
}

/// One labeled section of vector results.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSection {
    /// The entity kind this section covers.
    pub kind: NodeKind,

    /// Hits or the per-kind error marker.
    pub matches: KindMatches,
}

/// The merged retrieval context for one query.
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    /// The query this context answers.
    pub query: String,

    /// Graph substring matches as (kind, name) pairs.
    pub graph_matches: Vec<(NodeKind, String)>,

    /// Per-kind vector sections, in [`EMBEDDED_KINDS`] order.
    pub vector_sections: Vec<VectorSection>,
}

impl RetrievedContext {
    /// Whether nothing at all matched (error markers count as content,
    /// since they must stay visible to the caller).
    pub fn is_empty(&self) -> bool {
        self.graph_matches.is_empty()
            && self
                .vector_sections
                .iter()
                .all(|s| matches!(&s.matches, KindMatches::Hits(hits) if hits.is_empty()))
    }

    /// Render the context as a plain-text block with two labeled sections.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("Graph matches:\n");
        if self.graph_matches.is_empty() {
            out.push_str("  (none)\n");
        }
        for (kind, name) in &self.graph_matches {
            out.push_str(&format!("  {} -> {}\n", kind.label(), name));
        }

        out.push_str("\nVector matches:\n");
        for section in &self.vector_sections {
            match &section.matches {
                KindMatches::Hits(hits) => {
                    for hit in hits {
                        out.push_str(&format!(
                            "  {}: {} (distance {:.4})\n",
                            section.kind.label(),
                            hit.name,
                            hit.distance
                        ));
                    }
                }
                KindMatches::Error(reason) => {
                    out.push_str(&format!(
                        "  {} index error: {}\n",
                        section.kind.label(),
                        reason
                    ));
                }
            }
        }

        out
    }
}

// ============================================================================
// Retrieval
// ============================================================================

/// Run graph and vector retrieval for a query and merge the results.
///
/// Read-only over the store and the index bundles. Per-kind index problems
/// become error markers instead of failures; if the query itself cannot be
/// embedded, every vector section carries that marker and the graph match
/// still stands.
pub fn retrieve(
    store: &GraphStore,
    model: &dyn EmbeddingModel,
    index_root: &Path,
    query: &str,
    top_k: usize,
) -> RetrievedContext {
    let graph_matches = store.find_nodes_containing(GRAPH_MATCH_KINDS, query);
    debug!(
        "Graph match for {:?}: {} hits across {} kinds",
        query,
        graph_matches.len(),
        GRAPH_MATCH_KINDS.len()
    );

    let query_embedding = model.embed_one(query);

    let vector_sections = EMBEDDED_KINDS
        .iter()
        .map(|&kind| VectorSection {
            kind,
            matches: match &query_embedding {
                Ok(embedding) => search_kind(index_root, kind, embedding, top_k),
                Err(e) => KindMatches::Error(e.to_string()),
            },
        })
        .collect();

    RetrievedContext {
        query: query.to_string(),
        graph_matches,
        vector_sections,
    }
}

/// Search one kind's bundle, converting any failure into a marker.
fn search_kind(
    index_root: &Path,
    kind: NodeKind,
    embedding: &[f32],
    top_k: usize,
) -> KindMatches {
    let dir = index_dir_for_kind(index_root, kind);
    let bundle = match IndexBundle::load(&dir) {
        Ok(bundle) => bundle,
        Err(e) => return KindMatches::Error(e.to_string()),
    };

    match bundle.search(embedding, top_k) {
        Ok(hits) => KindMatches::Hits(
            hits.into_iter()
                .map(|(name, distance)| VectorHit { name, distance })
                .collect(),
        ),
        Err(e) => KindMatches::Error(e.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::build_indexes;
    use crate::testing::HashEmbedder;
    use tempfile::TempDir;

    fn indexed_fixture(temp: &TempDir) -> (GraphStore, HashEmbedder, std::path::PathBuf) {
        let mut store = GraphStore::open(temp.path().join("graph")).unwrap();
        store.upsert_node(NodeKind::Function, "ParseInput");
        store.upsert_node(NodeKind::Function, "render");
        store.upsert_node(NodeKind::Variable, "parser_state");
        store.upsert_node(NodeKind::File, "src/parse.py");

        let model = HashEmbedder::new(16);
        let index_root = temp.path().join("index");
        let report = build_indexes(&store, &model, &index_root);
        assert!(report.is_complete());

        (store, model, index_root)
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let (store, model, index_root) = indexed_fixture(&temp);

        let context = retrieve(&store, &model, &index_root, "parse", DEFAULT_TOP_K);

        assert!(context
            .graph_matches
            .contains(&(NodeKind::Function, "ParseInput".to_string())));
        assert!(context
            .graph_matches
            .contains(&(NodeKind::Variable, "parser_state".to_string())));
        assert!(context
            .graph_matches
            .contains(&(NodeKind::File, "src/parse.py".to_string())));
    }

    #[test]
    fn test_vector_sections_cover_every_embedded_kind() {
        let temp = TempDir::new().unwrap();
        let (store, model, index_root) = indexed_fixture(&temp);

        let context = retrieve(&store, &model, &index_root, "render", 2);

        assert_eq!(context.vector_sections.len(), EMBEDDED_KINDS.len());
        for section in &context.vector_sections {
            match &section.matches {
                KindMatches::Hits(hits) => assert!(!hits.is_empty()),
                KindMatches::Error(e) => panic!("unexpected error for {}: {}", section.kind, e),
            }
        }

        // An indexed name queried verbatim is its own nearest neighbor.
        let functions = &context.vector_sections[0];
        match &functions.matches {
            KindMatches::Hits(hits) => {
                assert_eq!(hits[0].name, "render");
                assert!(hits[0].distance.abs() < 1e-5);
            }
            KindMatches::Error(_) => unreachable!(),
        }
    }

    #[test]
    fn test_missing_kind_degrades_to_marker() {
        let temp = TempDir::new().unwrap();
        let (store, model, index_root) = indexed_fixture(&temp);

        // Remove the Function bundle entirely.
        std::fs::remove_dir_all(index_dir_for_kind(&index_root, NodeKind::Function)).unwrap();

        let context = retrieve(&store, &model, &index_root, "parse", DEFAULT_TOP_K);

        let function_section = &context.vector_sections[0];
        assert!(matches!(function_section.matches, KindMatches::Error(_)));

        // The other kinds still return hits, and the graph match stands.
        assert!(matches!(
            context.vector_sections[1].matches,
            KindMatches::Hits(_)
        ));
        assert!(matches!(
            context.vector_sections[2].matches,
            KindMatches::Hits(_)
        ));
        assert!(!context.graph_matches.is_empty());

        // The marker is visible in the rendered block.
        assert!(context.render().contains("Function index error:"));
    }

    #[test]
    fn test_render_sections_in_order() {
        let temp = TempDir::new().unwrap();
        let (store, model, index_root) = indexed_fixture(&temp);

        let rendered = retrieve(&store, &model, &index_root, "parse", 1).render();

        let graph_pos = rendered.find("Graph matches:").unwrap();
        let vector_pos = rendered.find("Vector matches:").unwrap();
        assert!(graph_pos < vector_pos);
        assert!(rendered.contains("Function -> ParseInput"));
    }

    #[test]
    fn test_retrieval_is_read_only() {
        let temp = TempDir::new().unwrap();
        let (store, model, index_root) = indexed_fixture(&temp);
        let before = store.stats();

        let _ = retrieve(&store, &model, &index_root, "anything", DEFAULT_TOP_K);

        assert_eq!(store.stats(), before);
    }
}
