//! Graph entity definitions.
//!
//! This module defines the records stored in the code graph:
//! - [`NodeKind`] / [`RelKind`] - the closed sets of node and edge types
//! - [`GraphNode`] - a node, keyed by its `(kind, name)` pair
//! - [`GraphEdge`] - a directed, typed relationship between two nodes
//! - [`GraphStats`] - aggregate counts
//!
//! ## Identity
//!
//! A node's identity is its `(kind, name)` pair. Names are root-relative,
//! separator-normalized paths for `Directory` and `File` nodes, and bare
//! identifiers for everything else. Identifier-kinded entities are *not*
//! scoped by file: the same function name in two files is one node.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// NodeKind
// ============================================================================

/// The closed set of node types stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A directory, named by its root-relative path.
    Directory,
    /// A file, named by its root-relative path.
    File,
    /// A function definition name.
    Function,
    /// A class definition name.
    Class,
    /// An imported module or path string.
    Import,
    /// A variable binding name.
    Variable,
    /// A stylesheet class selector, without the leading `.`.
    CssClass,
    /// A stylesheet id selector, without the leading `#`.
    CssId,
    /// A configuration entry. Never produced by extraction, but part of the
    /// retrieval kind set for graphs populated by other writers.
    Configuration,
}

impl NodeKind {
    /// Human-readable label used in rendered retrieval output.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Directory => "Directory",
            NodeKind::File => "File",
            NodeKind::Function => "Function",
            NodeKind::Class => "Class",
            NodeKind::Import => "Import",
            NodeKind::Variable => "Variable",
            NodeKind::CssClass => "CSSClass",
            NodeKind::CssId => "CSSID",
            NodeKind::Configuration => "Configuration",
        }
    }

    /// Short lowercase tag used in file and directory names.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
            NodeKind::Function => "function",
            NodeKind::Class => "class",
            NodeKind::Import => "import",
            NodeKind::Variable => "variable",
            NodeKind::CssClass => "css_class",
            NodeKind::CssId => "css_id",
            NodeKind::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// RelKind
// ============================================================================

/// The closed set of relationship types.
///
/// All edges are directed. `SubdirectoryOf` runs parent directory to child
/// directory; the remaining kinds run from the containing/declaring node to
/// the contained/declared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelKind {
    /// Parent directory to child directory.
    SubdirectoryOf,
    /// Directory to file, or file to function/class.
    Contains,
    /// File to imported module.
    Imports,
    /// File to variable binding.
    Declares,
    /// File to stylesheet selector.
    Styles,
}

impl RelKind {
    /// Wire name of the relationship, as stored and rendered.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelKind::SubdirectoryOf => "SUBDIRECTORY_OF",
            RelKind::Contains => "CONTAINS",
            RelKind::Imports => "IMPORTS",
            RelKind::Declares => "DECLARES",
            RelKind::Styles => "STYLES",
        }
    }
}

impl std::fmt::Display for RelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// NodeRef
// ============================================================================

/// A reference to a node by its identity pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    /// Node type.
    pub kind: NodeKind,

    /// Node name, unique within its kind.
    pub name: String,
}

impl NodeRef {
    /// Create a new node reference.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.tag(), self.name)
    }
}

// ============================================================================
// GraphNode
// ============================================================================

/// A node in the code graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Node type.
    pub kind: NodeKind,

    /// Node name, unique within its kind.
    pub name: String,

    /// Timestamp when the node was first created.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the node was last upserted.
    pub updated_at: DateTime<Utc>,
}

impl GraphNode {
    /// Create a new node with both timestamps set to now.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            kind,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reference to this node's identity pair.
    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.kind, self.name.clone())
    }

    /// Update the `updated_at` timestamp to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// GraphEdge
// ============================================================================

/// A directed, typed relationship between two nodes.
///
/// Edge identity is the `(from, rel, to)` triple; upserting an existing
/// triple is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Source node.
    pub from: NodeRef,

    /// Relationship type.
    pub rel: RelKind,

    /// Target node.
    pub to: NodeRef,

    /// Timestamp when the edge was first created.
    pub created_at: DateTime<Utc>,
}

impl GraphEdge {
    /// Create a new edge with the creation timestamp set to now.
    pub fn new(from: NodeRef, rel: RelKind, to: NodeRef) -> Self {
        Self {
            from,
            rel,
            to,
            created_at: Utc::now(),
        }
    }

    /// The identity triple of this edge.
    pub fn key(&self) -> (NodeRef, RelKind, NodeRef) {
        (self.from.clone(), self.rel, self.to.clone())
    }
}

// ============================================================================
// GraphStats
// ============================================================================

/// Aggregate counts for a graph store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Total number of edges.
    pub edge_count: usize,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_labels() {
        assert_eq!(NodeKind::Function.label(), "Function");
        assert_eq!(NodeKind::CssClass.label(), "CSSClass");
        assert_eq!(NodeKind::CssId.label(), "CSSID");
        assert_eq!(NodeKind::Directory.tag(), "directory");
    }

    #[test]
    fn test_rel_kind_wire_names() {
        assert_eq!(RelKind::SubdirectoryOf.as_str(), "SUBDIRECTORY_OF");
        assert_eq!(RelKind::Contains.as_str(), "CONTAINS");
        assert_eq!(RelKind::Styles.to_string(), "STYLES");
    }

    #[test]
    fn test_graph_node_new() {
        let node = GraphNode::new(NodeKind::File, "src/main.py");

        assert_eq!(node.kind, NodeKind::File);
        assert_eq!(node.name, "src/main.py");
        assert_eq!(node.created_at, node.updated_at);
    }

    #[test]
    fn test_node_serialization_round_trip() {
        let node = GraphNode::new(NodeKind::Variable, "counter");
        let json = serde_json::to_string(&node).unwrap();

        assert!(json.contains("\"kind\":\"variable\""));
        assert!(json.contains("\"createdAt\":"));

        let back: GraphNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_edge_serialization_round_trip() {
        let edge = GraphEdge::new(
            NodeRef::new(NodeKind::File, "app.py"),
            RelKind::Imports,
            NodeRef::new(NodeKind::Import, "util"),
        );
        let json = serde_json::to_string(&edge).unwrap();

        assert!(json.contains("\"rel\":\"IMPORTS\""));

        let back: GraphEdge = serde_json::from_str(&json).unwrap();
        assert_eq!(back, edge);
    }

    #[test]
    fn test_edge_key_identity() {
        let a = GraphEdge::new(
            NodeRef::new(NodeKind::Directory, "src"),
            RelKind::Contains,
            NodeRef::new(NodeKind::File, "src/a.py"),
        );
        let b = GraphEdge::new(
            NodeRef::new(NodeKind::Directory, "src"),
            RelKind::Contains,
            NodeRef::new(NodeKind::File, "src/a.py"),
        );

        assert_eq!(a.key(), b.key());
    }
}
