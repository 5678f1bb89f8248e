//! Error types for repograph-core.

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific errors for repograph operations.
#[derive(Error, Debug)]
pub enum RepographError {
    /// The repository root does not exist or is not a directory.
    #[error("Repository root not found: {0}")]
    RepoRootNotFound(PathBuf),

    /// The traversal of the repository tree failed.
    #[error("Scan error under `{path}`: {message}")]
    Scan {
        /// Path being scanned when the error occurred.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A source file could not be read.
    #[error("Failed to read `{path}`: {message}")]
    FileRead {
        /// Path of the unreadable file.
        path: String,
        /// Description of the failure.
        message: String,
    },

    /// A kind has no entity names to embed.
    #[error("No {kind} names to embed; build the graph first.")]
    NothingToEmbed {
        /// Label of the affected entity kind.
        kind: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("Config error at `{path}`: {message}")]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// Storage-layer error (graph store or index bundle).
    #[error(transparent)]
    Db(#[from] repograph_db::DbError),

    /// Embedding-model error.
    #[error(transparent)]
    Model(#[from] repograph_model::ModelError),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A wrapped generic error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
