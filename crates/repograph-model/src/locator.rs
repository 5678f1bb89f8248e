//! Runtime resolution of model files on disk.
//!
//! Models are pre-installed disk assets; nothing is downloaded. The locator
//! searches, in order:
//!
//! 1. `$REPOGRAPH_MODELS_DIR`
//! 2. `~/.repograph/models`
//! 3. `{exe_dir}/models`
//!
//! Expected layout:
//!
//! ```text
//! {models_dir}/
//!   embeddings/
//!     all-MiniLM-L6-v2/
//!       config.json
//!       model.safetensors
//!       tokenizer.json
//! ```

use std::env;
use std::path::PathBuf;

use crate::error::{ModelError, ModelResult};

/// Environment variable overriding the models directory.
pub const MODELS_DIR_ENV: &str = "REPOGRAPH_MODELS_DIR";

/// Subdirectory holding embedding models.
pub const EMBEDDINGS_SUBDIR: &str = "embeddings";

/// Home-directory name for repograph data.
const HOME_DIR_NAME: &str = ".repograph";

/// Files a model directory must contain to be loadable.
pub const REQUIRED_MODEL_FILES: &[&str] = &["config.json", "model.safetensors", "tokenizer.json"];

/// Locates model directories using the documented search order.
#[derive(Debug, Clone, Default)]
pub struct ModelLocator {
    /// Fixed base directory, bypassing the search (used in tests).
    base_dir: Option<PathBuf>,
}

impl ModelLocator {
    /// Create a locator that uses the standard search order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator with a fixed base directory.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Resolve the base models directory, returning the first that exists.
    pub fn resolve_base_dir(&self) -> ModelResult<PathBuf> {
        if let Some(ref base) = self.base_dir {
            if base.is_dir() {
                return Ok(base.clone());
            }
            return Err(ModelError::ModelsDirectoryNotFound {
                searched: vec![base.clone()],
            });
        }

        let mut searched = Vec::new();

        if let Ok(env_path) = env::var(MODELS_DIR_ENV) {
            let path = PathBuf::from(env_path);
            if path.is_dir() {
                return Ok(path);
            }
            searched.push(path);
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(HOME_DIR_NAME).join("models");
            if path.is_dir() {
                return Ok(path);
            }
            searched.push(path);
        }

        if let Ok(exe) = env::current_exe() {
            if let Some(exe_dir) = exe.parent() {
                let path = exe_dir.join("models");
                if path.is_dir() {
                    return Ok(path);
                }
                searched.push(path);
            }
        }

        Err(ModelError::ModelsDirectoryNotFound { searched })
    }

    /// Resolve the directory for one embedding model by short name, and
    /// verify it contains every required file.
    pub fn embedding_model_dir(&self, model_name: &str) -> ModelResult<PathBuf> {
        let base = self.resolve_base_dir()?;
        let model_dir = base.join(EMBEDDINGS_SUBDIR).join(model_name);

        if !model_dir.is_dir() {
            return Err(ModelError::ModelNotFound {
                model_id: model_name.to_string(),
                path: model_dir,
            });
        }

        verify_model_dir(&model_dir)?;
        Ok(model_dir)
    }
}

/// Check that a model directory contains every required file.
pub fn verify_model_dir(model_dir: &std::path::Path) -> ModelResult<()> {
    let missing: Vec<&'static str> = REQUIRED_MODEL_FILES
        .iter()
        .copied()
        .filter(|f| !model_dir.join(f).exists())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ModelError::IncompleteModelFiles {
            path: model_dir.to_path_buf(),
            missing,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fixed_base_dir_must_exist() {
        let temp = TempDir::new().unwrap();
        let locator = ModelLocator::with_base_dir(temp.path());
        assert!(locator.resolve_base_dir().is_ok());

        let locator = ModelLocator::with_base_dir(temp.path().join("absent"));
        assert!(matches!(
            locator.resolve_base_dir(),
            Err(ModelError::ModelsDirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_embedding_model_dir_requires_all_files() {
        let temp = TempDir::new().unwrap();
        let model_dir = temp.path().join(EMBEDDINGS_SUBDIR).join("mini");
        fs::create_dir_all(&model_dir).unwrap();
        fs::write(model_dir.join("config.json"), "{}").unwrap();
        fs::write(model_dir.join("model.safetensors"), b"").unwrap();

        let locator = ModelLocator::with_base_dir(temp.path());
        let err = locator.embedding_model_dir("mini").unwrap_err();
        assert!(matches!(
            err,
            ModelError::IncompleteModelFiles { ref missing, .. } if missing == &vec!["tokenizer.json"]
        ));

        fs::write(model_dir.join("tokenizer.json"), "{}").unwrap();
        assert_eq!(locator.embedding_model_dir("mini").unwrap(), model_dir);
    }

    #[test]
    fn test_unknown_model_is_not_found() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(EMBEDDINGS_SUBDIR)).unwrap();

        let locator = ModelLocator::with_base_dir(temp.path());
        assert!(matches!(
            locator.embedding_model_dir("nope"),
            Err(ModelError::ModelNotFound { .. })
        ));
    }
}
