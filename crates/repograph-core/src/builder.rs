//! Graph build pipeline: scan, extract, upsert.
//!
//! Drives the scanner over a repository and feeds the graph store:
//! directory nodes and `SUBDIRECTORY_OF` edges first, then per file a File
//! node, its `CONTAINS` edge from the parent directory, and the entities
//! its extractor yields.
//!
//! One file's failure (unreadable content, syntax error) never aborts the
//! walk: the File node is kept, the failure is recorded as a warning, and
//! the skipped-file counter increments. Store write failures, by contrast,
//! propagate: a build against an unreachable store aborts, and rerunning it
//! is always safe because every write is an upsert.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use repograph_db::{GraphStore, NodeKind, RelKind};

use crate::errors::RepographError;
use crate::lang::{self, kind_for_path, Extraction, SourceKind};
use crate::scanner::{scan_repository, ScanEntry};

// ============================================================================
// BuildSummary
// ============================================================================

/// Result of one graph build run.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    /// Directories visited (excluding the root).
    pub directories: usize,

    /// Files visited.
    pub files: usize,

    /// Entity nodes newly created (functions, classes, imports, variables,
    /// selectors).
    pub entities_created: usize,

    /// Files whose extraction was skipped after a failure.
    pub skipped_files: usize,

    /// Human-readable notes about skipped files and walk problems.
    pub warnings: Vec<String>,
}

impl BuildSummary {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Build (or re-merge) the graph for a repository tree.
///
/// The caller owns persistence: flush the store afterwards to write the
/// result to disk.
pub fn build_graph(root: &Path, store: &mut GraphStore) -> Result<BuildSummary, RepographError> {
    let mut summary = BuildSummary::default();

    for item in scan_repository(root)? {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                summary.warn(format!("walk: {}", e));
                continue;
            }
        };

        match entry {
            ScanEntry::Directory { path, parent } => {
                store.upsert_node(NodeKind::Directory, &path);
                if !parent.is_empty() {
                    store.upsert_edge(
                        NodeKind::Directory,
                        &parent,
                        RelKind::SubdirectoryOf,
                        NodeKind::Directory,
                        &path,
                    );
                }
                summary.directories += 1;
            }
            ScanEntry::File {
                abs_path,
                path,
                parent,
            } => {
                store.upsert_node(NodeKind::File, &path);
                if !parent.is_empty() {
                    store.upsert_edge(
                        NodeKind::Directory,
                        &parent,
                        RelKind::Contains,
                        NodeKind::File,
                        &path,
                    );
                }
                summary.files += 1;

                let kind = kind_for_path(&path);
                if kind == SourceKind::Unknown {
                    continue;
                }

                let content = match fs::read_to_string(&abs_path) {
                    Ok(content) => content,
                    Err(e) => {
                        summary.warn(format!("{}: unreadable ({})", path, e));
                        summary.skipped_files += 1;
                        continue;
                    }
                };

                match lang::extract(kind, &content) {
                    Ok(extraction) => {
                        summary.entities_created +=
                            upsert_entities(store, &path, &extraction);
                    }
                    Err(e) => {
                        summary.warn(format!("{}: {}", path, e));
                        summary.skipped_files += 1;
                    }
                }
            }
        }
    }

    debug!(
        "Graph build complete: {} dirs, {} files, {} new entities, {} skipped",
        summary.directories, summary.files, summary.entities_created, summary.skipped_files
    );
    Ok(summary)
}

/// Upsert one file's extracted entities and their edges.
///
/// The File node already exists; edges follow node creation per file.
fn upsert_entities(store: &mut GraphStore, file_path: &str, extraction: &Extraction) -> usize {
    fn link(
        store: &mut GraphStore,
        created: &mut usize,
        file_path: &str,
        rel: RelKind,
        kind: NodeKind,
        name: &str,
    ) {
        if store.upsert_node(kind, name) {
            *created += 1;
        }
        store.upsert_edge(NodeKind::File, file_path, rel, kind, name);
    }

    let mut created = 0;
    match extraction {
        Extraction::Code(code) => {
            for name in &code.functions {
                link(store, &mut created, file_path, RelKind::Contains, NodeKind::Function, name);
            }
            for name in &code.classes {
                link(store, &mut created, file_path, RelKind::Contains, NodeKind::Class, name);
            }
            for name in &code.imports {
                link(store, &mut created, file_path, RelKind::Imports, NodeKind::Import, name);
            }
            for name in &code.variables {
                link(store, &mut created, file_path, RelKind::Declares, NodeKind::Variable, name);
            }
        }
        Extraction::Style(style) => {
            for name in &style.classes {
                link(store, &mut created, file_path, RelKind::Styles, NodeKind::CssClass, name);
            }
            for name in &style.ids {
                link(store, &mut created, file_path, RelKind::Styles, NodeKind::CssId, name);
            }
        }
        Extraction::None => {}
    }

    created
}

// ============================================================================
// Tests
// ============================================================================
