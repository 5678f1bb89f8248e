//! Configuration types for repograph-model.
//!
//! These are the canonical embedding configuration types; other crates use
//! or re-export them rather than defining duplicates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_EMBEDDING_MODEL_ID;

/// Default maximum sequence length for tokenization.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// Extract the short model name from a full model id.
///
/// E.g., "sentence-transformers/all-MiniLM-L6-v2" -> "all-MiniLM-L6-v2".
pub fn model_name_from_id(model_id: &str) -> &str {
    model_id.rsplit('/').next().unwrap_or(model_id)
}

// ============================================================================
// DevicePreference
// ============================================================================

/// Preference for the compute device.
///
/// This build runs CPU-only inference; requesting `Gpu` fails with a
/// device-not-available error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Select the best available device.
    #[default]
    Auto,
    /// Require a GPU.
    Gpu,
    /// Force CPU-only inference.
    Cpu,
}

impl std::fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Gpu => write!(f, "gpu"),
            Self::Cpu => write!(f, "cpu"),
        }
    }
}

impl std::str::FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gpu" | "metal" | "cuda" => Ok(Self::Gpu),
            "cpu" => Ok(Self::Cpu),
            _ => Err(format!(
                "Unknown device: '{}'. Use 'auto', 'gpu', or 'cpu'.",
                s
            )),
        }
    }
}

// ============================================================================
// ModelInfo
// ============================================================================

/// Information about a loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub model_id: String,

    /// Embedding dimension.
    pub dimension: usize,

    /// Maximum sequence length.
    pub max_seq_len: usize,
}

impl ModelInfo {
    /// Create new model info.
    pub fn new(model_id: impl Into<String>, dimension: usize, max_seq_len: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimension,
            max_seq_len,
        }
    }
}

// ============================================================================
// EmbeddingConfig
// ============================================================================

/// Configuration for the embedding model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingConfig {
    /// Model id (e.g., "sentence-transformers/all-MiniLM-L6-v2").
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Explicit path to the model directory. When unset, the directory is
    /// resolved through the model locator from the model id's short name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,

    /// Maximum sequence length for tokenization.
    #[serde(default = "default_max_sequence_length")]
    pub max_sequence_length: usize,

    /// Device preference.
    #[serde(default)]
    pub device: DevicePreference,
}

fn default_model_id() -> String {
    DEFAULT_EMBEDDING_MODEL_ID.to_string()
}

fn default_max_sequence_length() -> usize {
    DEFAULT_MAX_SEQUENCE_LENGTH
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            model_dir: None,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            device: DevicePreference::default(),
        }
    }
}

impl EmbeddingConfig {
    /// Create a config for a specific model id.
    pub fn for_model(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            ..Self::default()
        }
    }

    /// Pin the model directory explicitly.
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    /// Set the device preference.
    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    /// The short model name used for directory lookup.
    pub fn model_name(&self) -> &str {
        model_name_from_id(&self.model_id)
    }
}

// ============================================================================
// HuggingFaceModelConfig
// ============================================================================

/// The subset of a Hugging Face `config.json` this crate reads.
#[derive(Debug, Clone, Deserialize)]
pub struct HuggingFaceModelConfig {
    /// Hidden size, which is the embedding dimension after pooling.
    pub hidden_size: usize,

    /// Maximum positions the model supports.
    #[serde(default = "default_max_position_embeddings")]
    pub max_position_embeddings: usize,

    /// Declared model type (e.g., "bert").
    #[serde(default)]
    pub model_type: String,
}

fn default_max_position_embeddings() -> usize {
    512
}

impl HuggingFaceModelConfig {
    /// Whether the declared architecture is one this crate can load.
    pub fn is_supported(&self) -> bool {
        self.model_type.is_empty() || self.model_type.eq_ignore_ascii_case("bert")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_from_id() {
        assert_eq!(
            model_name_from_id("sentence-transformers/all-MiniLM-L6-v2"),
            "all-MiniLM-L6-v2"
        );
        assert_eq!(model_name_from_id("bare-model"), "bare-model");
    }

    #[test]
    fn test_device_preference_parse() {
        assert_eq!("cpu".parse::<DevicePreference>(), Ok(DevicePreference::Cpu));
        assert_eq!(
            "CUDA".parse::<DevicePreference>(),
            Ok(DevicePreference::Gpu)
        );
        assert!("quantum".parse::<DevicePreference>().is_err());
    }

    #[test]
    fn test_embedding_config_defaults() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.model_id, crate::DEFAULT_EMBEDDING_MODEL_ID);
        assert_eq!(config.max_sequence_length, DEFAULT_MAX_SEQUENCE_LENGTH);
        assert_eq!(config.device, DevicePreference::Auto);
        assert!(config.model_dir.is_none());
    }

    #[test]
    fn test_hf_config_supported() {
        let bert: HuggingFaceModelConfig =
            serde_json::from_str(r#"{"hidden_size": 384, "model_type": "bert"}"#).unwrap();
        assert!(bert.is_supported());
        assert_eq!(bert.hidden_size, 384);
        assert_eq!(bert.max_position_embeddings, 512);

        let other: HuggingFaceModelConfig =
            serde_json::from_str(r#"{"hidden_size": 768, "model_type": "roberta"}"#).unwrap();
        assert!(!other.is_supported());
    }
}
