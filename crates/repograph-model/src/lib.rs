//! # repograph-model
//!
//! ML inference layer for Repograph - text embeddings.
//!
//! This crate is the single source of truth for embedding inference. It
//! provides:
//!
//! - **[`EmbeddingModel`]**: the trait consumed by the indexing and
//!   retrieval pipeline (batch of strings in, fixed-dimension vectors out)
//! - **[`BertTextEncoder`]**: local Candle inference over a BERT
//!   sentence-transformer with mean pooling and L2 normalization
//! - **[`ModelLocator`]**: runtime resolution of model files on disk
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: identical input and model version always produce
//!    the same vector, so indexes and queries stay comparable.
//! 2. **Local-first**: models are disk assets; nothing is downloaded.
//! 3. **Provider-agnostic trait**: callers never see Candle types.
//!
//! ## Model Location
//!
//! Model directories are searched in this order:
//! 1. `$REPOGRAPH_MODELS_DIR`
//! 2. `~/.repograph/models`
//! 3. `{exe_dir}/models`

pub mod config;
pub mod error;
pub mod locator;

mod embedding;

pub use config::{DevicePreference, EmbeddingConfig, HuggingFaceModelConfig, ModelInfo};
pub use embedding::BertTextEncoder;
pub use error::{ModelError, ModelResult};
pub use locator::{ModelLocator, EMBEDDINGS_SUBDIR, MODELS_DIR_ENV, REQUIRED_MODEL_FILES};

/// Default embedding model id (full Hugging Face identifier).
pub const DEFAULT_EMBEDDING_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

// ============================================================================
// EmbeddingModel Trait
// ============================================================================

/// Trait for text embedding models.
///
/// Implementations must be `Send + Sync` and deterministic: the same input
/// under the same model version yields the same vector.
pub trait EmbeddingModel: Send + Sync + std::fmt::Debug {
    /// Generate embeddings for a batch of texts.
    ///
    /// Returns one vector per input, each of length [`dimension`].
    ///
    /// [`dimension`]: EmbeddingModel::dimension
    fn embed(&self, texts: &[&str]) -> ModelResult<Vec<Vec<f32>>>;

    /// Generate embeddings for owned strings.
    fn embed_batch(&self, texts: &[String]) -> ModelResult<Vec<Vec<f32>>> {
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        self.embed(&refs)
    }

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> ModelResult<Vec<f32>> {
        let mut results = self.embed(&[text])?;
        results.pop().ok_or_else(|| ModelError::EmbeddingFailed {
            model_id: self.model_id().to_string(),
            message: "embed returned no vectors".to_string(),
        })
    }

    /// The embedding dimension.
    fn dimension(&self) -> usize;

    /// Model information (id, dimension, sequence limit).
    fn model_info(&self) -> &ModelInfo;

    /// The model id.
    fn model_id(&self) -> &str {
        &self.model_info().model_id
    }
}

/// Create the default embedding model from configuration.
///
/// Resolves the model directory, loads weights and tokenizer, and returns a
/// boxed [`EmbeddingModel`].
pub fn create_embedding_model(config: &EmbeddingConfig) -> ModelResult<Box<dyn EmbeddingModel>> {
    let encoder = BertTextEncoder::new(config)?;
    Ok(Box::new(encoder))
}
