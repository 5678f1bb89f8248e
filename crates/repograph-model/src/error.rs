//! Error types for repograph-model.
//!
//! Errors carry enough context to tell the user what went wrong, where the
//! model files were expected, and how to fix it.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur during model discovery, loading, and inference.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No models directory found in any search location.
    #[error("{}", format_models_dir_not_found(.searched))]
    ModelsDirectoryNotFound {
        /// Every location that was tried, in search order.
        searched: Vec<PathBuf>,
    },

    /// Model files not found at the expected location.
    #[error("Model not found: {model_id}\n\nExpected at: {}\n\nEnsure the model directory exists and contains config.json, model.safetensors, and tokenizer.json.", path.display())]
    ModelNotFound {
        /// The model identifier.
        model_id: String,
        /// Path where the model was expected.
        path: PathBuf,
    },

    /// Model directory exists but lacks required files.
    #[error("Model directory {} is missing required files: {}", path.display(), missing.join(", "))]
    IncompleteModelFiles {
        /// Path to the model directory.
        path: PathBuf,
        /// The files that were not found.
        missing: Vec<&'static str>,
    },

    /// Failed to load model weights or tokenizer.
    #[error("Failed to load model '{model_id}': {message}")]
    ModelLoad {
        /// The model identifier.
        model_id: String,
        /// Description of the failure.
        message: String,
    },

    /// The model's config.json is invalid or incompatible.
    #[error("Invalid model configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Tokenization failed.
    #[error("Tokenization failed: {message}")]
    Tokenization {
        /// Description of the failure.
        message: String,
    },

    /// Embedding inference failed.
    #[error("Embedding failed for model '{model_id}': {message}")]
    EmbeddingFailed {
        /// The model identifier.
        model_id: String,
        /// Description of the failure.
        message: String,
    },

    /// The requested compute device is not available.
    #[error("Compute device not available: {reason}")]
    DeviceNotAvailable {
        /// Why the device cannot be used.
        reason: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Shorthand for a load failure.
    pub fn model_load(model_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            model_id: model_id.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an inference failure.
    pub fn embedding_failed(model_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingFailed {
            model_id: model_id.into(),
            message: message.into(),
        }
    }
}

fn format_models_dir_not_found(searched: &[PathBuf]) -> String {
    let list = searched
        .iter()
        .enumerate()
        .map(|(i, p)| format!("  {}. {}", i + 1, p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Models directory not found.\n\n\
        Searched locations:\n\
        {list}\n\n\
        To fix:\n\
        1. Set $REPOGRAPH_MODELS_DIR to your models directory, OR\n\
        2. Copy models to ~/.repograph/models/, OR\n\
        3. Ensure models/ exists next to the repograph binary."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_dir_not_found_lists_locations() {
        let err = ModelError::ModelsDirectoryNotFound {
            searched: vec![PathBuf::from("/a/models"), PathBuf::from("/b/models")],
        };
        let msg = err.to_string();
        assert!(msg.contains("/a/models"));
        assert!(msg.contains("/b/models"));
        assert!(msg.contains("REPOGRAPH_MODELS_DIR"));
    }

    #[test]
    fn test_incomplete_model_lists_missing_files() {
        let err = ModelError::IncompleteModelFiles {
            path: PathBuf::from("/m/all-MiniLM-L6-v2"),
            missing: vec!["tokenizer.json"],
        };
        assert!(err.to_string().contains("tokenizer.json"));
    }
}
