//! Deterministic embedding double for tests.
//!
//! [`HashEmbedder`] derives a unit vector from a hash of the input text, so
//! identical strings always embed identically and self-queries return
//! distance zero. It stands in for the real model wherever loading weights
//! is not the point of the test.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use repograph_model::{EmbeddingModel, ModelInfo, ModelResult};

/// Hash-seeded, deterministic embedding model.
#[derive(Debug)]
pub struct HashEmbedder {
    info: ModelInfo,
}

impl HashEmbedder {
    /// Create an embedder producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            info: ModelInfo::new("hash-embedder", dimension, 256),
        }
    }

    fn hash_to_embedding(&self, content: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.info.dimension);
        let mut state = seed;
        for _ in 0..self.info.dimension {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 33) as f32 / (u32::MAX as f32 / 2.0)) - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

impl EmbeddingModel for HashEmbedder {
    fn embed(&self, texts: &[&str]) -> ModelResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.hash_to_embedding(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.info.dimension
    }

    fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}
