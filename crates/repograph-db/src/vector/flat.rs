//! Exact flat L2 nearest-neighbor index.
//!
//! Vectors are stored row-major in append order and searched by linear
//! scan. No approximation: over the small per-kind corpora this system
//! indexes, exactness matters more than query latency.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::error::{DbError, DbResult};

/// A single hit from a flat index search.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSearchHit {
    /// Row id of the matched vector (its append position).
    pub row: usize,

    /// Euclidean distance to the query. Lower is better.
    pub distance: f32,
}

/// Exact L2 index over fixed-dimension vectors.
///
/// Row ids are assigned in append order and never change; persisting and
/// reloading the index reconstructs rows in exactly the same order.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct FlatL2Index {
    /// Dimension every row must have.
    dimension: usize,

    /// Row-major storage: `rows * dimension` values.
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// The dimension this index was created with.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of rows currently stored.
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    /// Whether the index has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append one vector, assigning it the next row id.
    pub fn push(&mut self, vector: &[f32]) -> DbResult<()> {
        if vector.len() != self.dimension {
            return Err(DbError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Append a batch of vectors in the given order.
    pub fn extend(&mut self, vectors: &[Vec<f32>]) -> DbResult<()> {
        for vector in vectors {
            self.push(vector)?;
        }
        Ok(())
    }

    /// The vector stored at `row`, if present.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.len() {
            return None;
        }
        let start = row * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    /// Exhaustive top-`k` search by Euclidean distance.
    ///
    /// Returns up to `k` hits sorted ascending by distance (ties broken by
    /// row id, so results are deterministic).
    pub fn search(&self, query: &[f32], k: usize) -> DbResult<Vec<FlatSearchHit>> {
        if query.len() != self.dimension {
            return Err(DbError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<FlatSearchHit> = (0..self.len())
            .map(|row| {
                let start = row * self.dimension;
                let stored = &self.data[start..start + self.dimension];
                FlatSearchHit {
                    row,
                    distance: euclidean_distance(query, stored),
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.row.cmp(&b.row))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

/// Compute Euclidean (L2) distance between two vectors.
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

// ============================================================================
// Tests
// ============================================================================
