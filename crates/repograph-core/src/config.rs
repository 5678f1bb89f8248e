//! Configuration for repograph.
//!
//! Settings load from a YAML file (default `~/.repograph/config.yaml`,
//! overridable by the surrounding CLI) with built-in defaults for every
//! field, so a missing file is not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use repograph_model::{DevicePreference, DEFAULT_EMBEDDING_MODEL_ID};

use crate::constants::{CONFIG_FILENAME, HOME_DIR_NAME};
use crate::errors::RepographError;
use crate::retrieval::DEFAULT_TOP_K;

// ============================================================================
// RepographConfig
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepographConfig {
    /// Embedding model settings.
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Retrieval settings.
    #[serde(default)]
    pub retrieval: RetrievalSettings,
}

/// Embedding model section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Model id to load.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Compute device preference.
    #[serde(default)]
    pub device: DevicePreference,
}

fn default_model_id() -> String {
    DEFAULT_EMBEDDING_MODEL_ID.to_string()
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            device: DevicePreference::default(),
        }
    }
}

/// Retrieval section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalSettings {
    /// Per-kind result count for vector search.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Default path of the user-level config file (`~/.repograph/config.yaml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HOME_DIR_NAME).join(CONFIG_FILENAME))
}

impl RepographConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults; an unreadable or invalid file is
    /// an error.
    pub fn load(path: &Path) -> Result<Self, RepographError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| RepographError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| RepographError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from an explicit path, or from the default location, or fall
    /// back to defaults when neither resolves.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, RepographError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
