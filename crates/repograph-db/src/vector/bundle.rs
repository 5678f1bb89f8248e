//! Index bundle: vectors, name list, and metadata persisted as one unit.
//!
//! Storage layout, one directory per entity kind:
//!
//! ```text
//! <data-dir>/index/<kind>/
//! ├── vectors.bin   # bincode-encoded FlatL2Index
//! ├── names.json    # name list, parallel to the index rows
//! └── meta.json     # model id, dimension, row count, build timestamp
//! ```
//!
//! The name list translates search row ids back into entity names by
//! position, so the bundle is only valid when every artifact is present and
//! the row count, names length, and recorded metadata agree. `load` enforces
//! all of that; `save` replaces any prior bundle wholesale.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use bincode::config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DbError, DbResult};

use super::flat::FlatL2Index;

/// Filename for the encoded vector index.
pub const VECTORS_FILENAME: &str = "vectors.bin";

/// Filename for the parallel name list.
pub const NAMES_FILENAME: &str = "names.json";

/// Filename for the bundle metadata.
pub const META_FILENAME: &str = "meta.json";

// ============================================================================
// IndexMeta
// ============================================================================

/// Metadata describing how a bundle was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMeta {
    /// Identifier of the embedding model that produced the vectors.
    pub model_id: String,

    /// Vector dimension.
    pub dimension: usize,

    /// Number of rows in the index (equals the name list length).
    pub rows: usize,

    /// Timestamp when the bundle was built.
    pub built_at: DateTime<Utc>,
}

impl IndexMeta {
    /// Create metadata for a freshly built index.
    pub fn new(model_id: impl Into<String>, dimension: usize, rows: usize) -> Self {
        Self {
            model_id: model_id.into(),
            dimension,
            rows,
            built_at: Utc::now(),
        }
    }
}

// ============================================================================
// IndexBundle
// ============================================================================

/// A flat index together with its parallel name list and metadata.
#[derive(Debug, Clone)]
pub struct IndexBundle {
    /// The nearest-neighbor structure.
    pub index: FlatL2Index,

    /// Entity names, one per index row, in row order.
    pub names: Vec<String>,

    /// Build metadata.
    pub meta: IndexMeta,
}

impl IndexBundle {
    /// Assemble a bundle, validating that names and rows line up.
    pub fn new(
        index: FlatL2Index,
        names: Vec<String>,
        model_id: impl Into<String>,
    ) -> DbResult<Self> {
        if names.len() != index.len() {
            return Err(DbError::BundleMisaligned {
                rows: index.len(),
                names: names.len(),
            });
        }
        let meta = IndexMeta::new(model_id, index.dimension(), index.len());
        Ok(Self { index, names, meta })
    }

    /// Number of rows in the bundle.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the bundle has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Top-`k` search, translating row ids to names by position.
    pub fn search(&self, query: &[f32], k: usize) -> DbResult<Vec<(String, f32)>> {
        let hits = self.index.search(query, k)?;
        Ok(hits
            .into_iter()
            .map(|hit| (self.names[hit.row].clone(), hit.distance))
            .collect())
    }

    /// Write all three artifacts, replacing any existing bundle.
    pub fn save(&self, dir: &Path) -> DbResult<()> {
        fs::create_dir_all(dir).map_err(|e| DbError::IndexIo {
            path: dir.to_path_buf(),
            message: format!("Failed to create index directory: {}", e),
        })?;

        let vectors_file = dir.join(VECTORS_FILENAME);
        let file = File::create(&vectors_file).map_err(|e| DbError::IndexIo {
            path: vectors_file.clone(),
            message: e.to_string(),
        })?;
        let mut writer = BufWriter::new(file);
        bincode::encode_into_std_write(&self.index, &mut writer, config::standard()).map_err(
            |e| DbError::IndexParse {
                path: vectors_file.clone(),
                message: format!("Failed to encode vectors: {}", e),
            },
        )?;

        let names_file = dir.join(NAMES_FILENAME);
        let names_json = serde_json::to_string(&self.names)?;
        fs::write(&names_file, names_json).map_err(|e| DbError::IndexIo {
            path: names_file,
            message: e.to_string(),
        })?;

        let meta_file = dir.join(META_FILENAME);
        let meta_json = serde_json::to_string_pretty(&self.meta)?;
        fs::write(&meta_file, meta_json).map_err(|e| DbError::IndexIo {
            path: meta_file,
            message: e.to_string(),
        })?;

        debug!(
            "Saved index bundle to {}: {} rows, dimension {}",
            dir.display(),
            self.len(),
            self.index.dimension()
        );
        Ok(())
    }

    /// Load a bundle, requiring all artifacts and verifying alignment.
    pub fn load(dir: &Path) -> DbResult<Self> {
        let vectors_file = dir.join(VECTORS_FILENAME);
        let names_file = dir.join(NAMES_FILENAME);
        let meta_file = dir.join(META_FILENAME);

        for (path, label) in [
            (&vectors_file, VECTORS_FILENAME),
            (&names_file, NAMES_FILENAME),
            (&meta_file, META_FILENAME),
        ] {
            if !path.exists() {
                return Err(DbError::BundleIncomplete {
                    path: dir.to_path_buf(),
                    missing: label.to_string(),
                });
            }
        }

        let file = File::open(&vectors_file).map_err(|e| DbError::IndexIo {
            path: vectors_file.clone(),
            message: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);
        let index: FlatL2Index = bincode::decode_from_std_read(&mut reader, config::standard())
            .map_err(|e| DbError::IndexParse {
                path: vectors_file,
                message: format!("Failed to decode vectors: {}", e),
            })?;

        let names_content = fs::read_to_string(&names_file).map_err(|e| DbError::IndexIo {
            path: names_file.clone(),
            message: e.to_string(),
        })?;
        let names: Vec<String> =
            serde_json::from_str(&names_content).map_err(|e| DbError::IndexParse {
                path: names_file,
                message: e.to_string(),
            })?;

        let meta_content = fs::read_to_string(&meta_file).map_err(|e| DbError::IndexIo {
            path: meta_file.clone(),
            message: e.to_string(),
        })?;
        let meta: IndexMeta =
            serde_json::from_str(&meta_content).map_err(|e| DbError::IndexParse {
                path: meta_file,
                message: e.to_string(),
            })?;

        if names.len() != index.len() || meta.rows != index.len() {
            return Err(DbError::BundleMisaligned {
                rows: index.len(),
                names: names.len(),
            });
        }

        Ok(Self { index, names, meta })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_bundle() -> IndexBundle {
        let mut index = FlatL2Index::new(2);
        index.push(&[1.0, 0.0]).unwrap();
        index.push(&[0.0, 1.0]).unwrap();
        IndexBundle::new(
            index,
            vec!["alpha".to_string(), "beta".to_string()],
            "test-model",
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_misaligned_names() {
        let mut index = FlatL2Index::new(2);
        index.push(&[1.0, 0.0]).unwrap();

        let err = IndexBundle::new(index, vec![], "test-model").unwrap_err();
        assert!(matches!(
            err,
            DbError::BundleMisaligned { rows: 1, names: 0 }
        ));
    }

    #[test]
    fn test_search_translates_rows_to_names() {
        let bundle = sample_bundle();

        let hits = bundle.search(&[0.0, 0.9], 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "beta");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("function");

        let bundle = sample_bundle();
        bundle.save(&dir).unwrap();

        let loaded = IndexBundle::load(&dir).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.names, vec!["alpha", "beta"]);
        assert_eq!(loaded.meta.model_id, "test-model");
        assert_eq!(loaded.meta.dimension, 2);

        // Row order is reconstructed exactly.
        let hits = loaded.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(hits[0].0, "alpha");
        assert!(hits[0].1.abs() < 1e-6);
    }

    #[test]
    fn test_load_fails_on_missing_artifact() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("variable");

        let bundle = sample_bundle();
        bundle.save(&dir).unwrap();
        fs::remove_file(dir.join(NAMES_FILENAME)).unwrap();

        let err = IndexBundle::load(&dir).unwrap_err();
        assert!(matches!(err, DbError::BundleIncomplete { .. }));
    }

    #[test]
    fn test_load_fails_on_absent_bundle() {
        let temp = TempDir::new().unwrap();
        let err = IndexBundle::load(&temp.path().join("nothing")).unwrap_err();
        assert!(matches!(err, DbError::BundleIncomplete { .. }));
    }

    #[test]
    fn test_save_overwrites_previous_bundle() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("file");

        sample_bundle().save(&dir).unwrap();

        let mut index = FlatL2Index::new(2);
        index.push(&[0.5, 0.5]).unwrap();
        let smaller = IndexBundle::new(index, vec!["gamma".to_string()], "test-model").unwrap();
        smaller.save(&dir).unwrap();

        let loaded = IndexBundle::load(&dir).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.names, vec!["gamma"]);
    }
}
