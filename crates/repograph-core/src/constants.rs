//! Common constants used throughout repograph-core.
//!
//! Centralizes directory names and traversal rules so every component
//! agrees on the on-disk layout.

use std::path::{Path, PathBuf};

// ============================================================================
// Directory Names
// ============================================================================

/// The name of the repograph data directory within a repository.
///
/// All persisted state lives under `.repograph/` at the repository root.
pub const DATA_DIR: &str = ".repograph";

/// Subdirectory of the data dir holding the graph store.
pub const GRAPH_DIR_NAME: &str = "graph";

/// Subdirectory of the data dir holding the per-kind index bundles.
pub const INDEX_DIR_NAME: &str = "index";

/// The name of the user-level configuration directory (`~/.repograph`).
pub const HOME_DIR_NAME: &str = ".repograph";

/// Filename of the user-level configuration file.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Graph store directory under a data dir.
pub fn graph_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(GRAPH_DIR_NAME)
}

/// Index root directory under a data dir.
pub fn index_root(data_dir: &Path) -> PathBuf {
    data_dir.join(INDEX_DIR_NAME)
}

// ============================================================================
// Ignored Directories
// ============================================================================

/// Directories always skipped during repository traversal.
///
/// These hold generated or vendored content that would pollute the graph:
/// - `.git` - version control metadata
/// - `.repograph` - our own data directory
/// - `target`, `dist`, `build` - build output
/// - `node_modules` - vendored dependencies
/// - `__pycache__`, `.venv`, `venv` - Python caches and environments
pub const ALWAYS_IGNORED_DIRS: &[&str] = &[
    ".git",
    DATA_DIR,
    "target",
    "dist",
    "build",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
];

/// Check if a directory name should be skipped during traversal.
///
/// `name` is a bare directory name, not a path.
#[inline]
pub fn should_ignore_dir(name: &str) -> bool {
    ALWAYS_IGNORED_DIRS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_ignore_dir() {
        assert!(should_ignore_dir(".git"));
        assert!(should_ignore_dir(".repograph"));
        assert!(should_ignore_dir("node_modules"));
        assert!(!should_ignore_dir("src"));
        assert!(!should_ignore_dir("git"));
    }

    #[test]
    fn test_layout_helpers() {
        let data = Path::new("/repo/.repograph");
        assert_eq!(graph_dir(data), Path::new("/repo/.repograph/graph"));
        assert_eq!(index_root(data), Path::new("/repo/.repograph/index"));
    }
}
