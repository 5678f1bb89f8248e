//! Error types for repograph-db.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for storage operations.
pub type DbResult<T> = Result<T, DbError>;

/// Storage-layer errors for graph and vector index operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to read or write a graph store file.
    #[error("Graph store I/O error at `{path}`: {message}")]
    GraphIo {
        /// Path to the graph file or directory.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// Failed to parse a graph store record.
    #[error("Graph store parse error at `{path}`: {message}")]
    GraphParse {
        /// Path to the graph file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Failed to read or write a vector index artifact.
    #[error("Vector index I/O error at `{path}`: {message}")]
    IndexIo {
        /// Path to the index file or directory.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// Failed to decode a vector index artifact.
    #[error("Vector index parse error at `{path}`: {message}")]
    IndexParse {
        /// Path to the index file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// An index bundle is missing one of its required artifacts.
    ///
    /// The vectors blob and the name list are produced and consumed as a
    /// single unit; a bundle with either artifact absent is unusable.
    #[error("Index bundle at `{path}` is incomplete: missing {missing}")]
    BundleIncomplete {
        /// Path to the bundle directory.
        path: PathBuf,
        /// The artifact that was not found.
        missing: String,
    },

    /// The name list length does not match the index row count.
    #[error("Index bundle misaligned: {rows} vector rows but {names} names")]
    BundleMisaligned {
        /// Number of rows in the vector index.
        rows: usize,
        /// Number of entries in the name list.
        names: usize,
    },

    /// A vector's dimension does not match the index dimension.
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index was created with.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
