//! JSONL-backed graph store with idempotent upserts.
//!
//! The store keeps all nodes and edges in memory, keyed for constant-time
//! find-or-create, and persists them as one JSON record per line:
//!
//! ```text
//! <data-dir>/graph/
//! ├── nodes.jsonl
//! └── edges.jsonl
//! ```
//!
//! Insertion order is preserved and is the order `names_of_kind` reports,
//! which downstream index builds rely on for stable row ordering.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DbError, DbResult};

use super::entities::{GraphEdge, GraphNode, GraphStats, NodeKind, NodeRef, RelKind};

/// Filename for the node records.
pub const NODES_FILENAME: &str = "nodes.jsonl";

/// Filename for the edge records.
pub const EDGES_FILENAME: &str = "edges.jsonl";

/// In-memory graph with JSONL persistence.
///
/// All mutating operations are merge semantics: repeating a call with
/// identical arguments never creates a duplicate node or edge.
pub struct GraphStore {
    /// Directory holding the JSONL files.
    dir: PathBuf,

    /// Nodes in insertion order.
    nodes: Vec<GraphNode>,

    /// Node identity pair to position in `nodes`.
    node_ids: HashMap<(NodeKind, String), usize>,

    /// Edges in insertion order.
    edges: Vec<GraphEdge>,

    /// Edge identity triples already present.
    edge_ids: HashSet<(NodeRef, RelKind, NodeRef)>,
}

impl GraphStore {
    /// Open a graph store, creating the directory if needed and loading any
    /// existing records.
    pub fn open(dir: impl Into<PathBuf>) -> DbResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| DbError::GraphIo {
            path: dir.clone(),
            message: format!("Failed to create graph directory: {}", e),
        })?;

        let mut store = Self {
            dir,
            nodes: Vec::new(),
            node_ids: HashMap::new(),
            edges: Vec::new(),
            edge_ids: HashSet::new(),
        };

        let nodes_path = store.nodes_path();
        if nodes_path.exists() {
            store.load_nodes(&nodes_path)?;
        }
        let edges_path = store.edges_path();
        if edges_path.exists() {
            store.load_edges(&edges_path)?;
        }

        debug!(
            "Opened graph store at {:?}: {} nodes, {} edges",
            store.dir,
            store.nodes.len(),
            store.edges.len()
        );
        Ok(store)
    }

    /// Path to the node records file.
    pub fn nodes_path(&self) -> PathBuf {
        self.dir.join(NODES_FILENAME)
    }

    /// Path to the edge records file.
    pub fn edges_path(&self) -> PathBuf {
        self.dir.join(EDGES_FILENAME)
    }

    fn load_nodes(&mut self, path: &Path) -> DbResult<()> {
        let file = File::open(path).map_err(|e| DbError::GraphIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| DbError::GraphIo {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let node: GraphNode =
                serde_json::from_str(&line).map_err(|e| DbError::GraphParse {
                    path: path.to_path_buf(),
                    message: format!("line {}: {}", line_num + 1, e),
                })?;
            let key = (node.kind, node.name.clone());
            if self.node_ids.contains_key(&key) {
                continue;
            }
            self.node_ids.insert(key, self.nodes.len());
            self.nodes.push(node);
        }
        Ok(())
    }

    fn load_edges(&mut self, path: &Path) -> DbResult<()> {
        let file = File::open(path).map_err(|e| DbError::GraphIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| DbError::GraphIo {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let edge: GraphEdge =
                serde_json::from_str(&line).map_err(|e| DbError::GraphParse {
                    path: path.to_path_buf(),
                    message: format!("line {}: {}", line_num + 1, e),
                })?;
            if self.edge_ids.contains(&edge.key()) {
                continue;
            }
            self.edge_ids.insert(edge.key());
            self.edges.push(edge);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Upserts
    // ------------------------------------------------------------------

    /// Find-or-create a node.
    ///
    /// Returns `true` if the node was created, `false` if it already existed
    /// (in which case only `updated_at` is touched).
    pub fn upsert_node(&mut self, kind: NodeKind, name: &str) -> bool {
        let key = (kind, name.to_string());
        if let Some(&id) = self.node_ids.get(&key) {
            self.nodes[id].touch();
            return false;
        }
        self.node_ids.insert(key, self.nodes.len());
        self.nodes.push(GraphNode::new(kind, name));
        true
    }

    /// Find-or-create a directed edge.
    ///
    /// Both endpoints are upserted first, so the call tolerates any
    /// traversal order. Returns `true` if the edge was created.
    pub fn upsert_edge(
        &mut self,
        from_kind: NodeKind,
        from_name: &str,
        rel: RelKind,
        to_kind: NodeKind,
        to_name: &str,
    ) -> bool {
        self.upsert_node(from_kind, from_name);
        self.upsert_node(to_kind, to_name);

        let key = (
            NodeRef::new(from_kind, from_name),
            rel,
            NodeRef::new(to_kind, to_name),
        );
        if self.edge_ids.contains(&key) {
            return false;
        }
        let edge = GraphEdge::new(key.0.clone(), rel, key.2.clone());
        self.edge_ids.insert(key);
        self.edges.push(edge);
        true
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Names of all nodes of one kind, in insertion order.
    pub fn names_of_kind(&self, kind: NodeKind) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| n.name.clone())
            .collect()
    }

    /// All nodes whose kind is in `kinds` and whose name contains `query`
    /// case-insensitively.
    ///
    /// This is a recall-oriented filter: every match is returned, unscored.
    pub fn find_nodes_containing(
        &self,
        kinds: &[NodeKind],
        query: &str,
    ) -> Vec<(NodeKind, String)> {
        let needle = query.to_lowercase();
        self.nodes
            .iter()
            .filter(|n| kinds.contains(&n.kind))
            .filter(|n| n.name.to_lowercase().contains(&needle))
            .map(|n| (n.kind, n.name.clone()))
            .collect()
    }

    /// Whether a node with the given identity pair exists.
    pub fn contains_node(&self, kind: NodeKind, name: &str) -> bool {
        self.node_ids.contains_key(&(kind, name.to_string()))
    }

    /// Whether an edge with the given identity triple exists.
    pub fn contains_edge(
        &self,
        from_kind: NodeKind,
        from_name: &str,
        rel: RelKind,
        to_kind: NodeKind,
        to_name: &str,
    ) -> bool {
        self.edge_ids.contains(&(
            NodeRef::new(from_kind, from_name),
            rel,
            NodeRef::new(to_kind, to_name),
        ))
    }

    /// All edges of one relationship kind.
    pub fn edges_of_kind(&self, rel: RelKind) -> Vec<&GraphEdge> {
        self.edges.iter().filter(|e| e.rel == rel).collect()
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Aggregate counts.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write all records to disk, replacing the previous files.
    pub fn flush(&self) -> DbResult<()> {
        self.write_jsonl(&self.nodes_path(), &self.nodes)?;
        self.write_jsonl(&self.edges_path(), &self.edges)?;
        debug!(
            "Flushed graph store: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        Ok(())
    }

    fn write_jsonl<T: serde::Serialize>(&self, path: &Path, records: &[T]) -> DbResult<()> {
        let file = File::create(path).map_err(|e| DbError::GraphIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut writer = BufWriter::new(file);
        for record in records {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{}", line).map_err(|e| DbError::GraphIo {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        writer.flush().map_err(|e| DbError::GraphIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
