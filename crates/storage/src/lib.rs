//! Similarity index backends.

pub mod qdrant;

pub use qdrant::{Collection, QdrantIndex, ScoredRecord, VectorIndex, VectorRecord};
