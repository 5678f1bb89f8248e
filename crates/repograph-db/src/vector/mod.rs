//! Flat vector index and its on-disk bundle.
//!
//! A [`FlatL2Index`] is an exact, exhaustive nearest-neighbor structure:
//! queries scan every row and rank by Euclidean distance. Row ids are
//! append positions, which is what lets the parallel name list translate a
//! search hit back into an entity name.
//!
//! An [`IndexBundle`] pairs the index with that name list and a metadata
//! record, and persists all three as one unit.

mod bundle;
mod flat;

pub use bundle::{IndexBundle, IndexMeta, META_FILENAME, NAMES_FILENAME, VECTORS_FILENAME};
pub use flat::{FlatL2Index, FlatSearchHit};
