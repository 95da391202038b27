//! Traits and invocation policies for the external extraction and
//! embedding collaborators

pub mod embedding;
pub mod extraction;

pub use embedding::{CachedEmbedder, EmbeddingCache, EmbeddingService};
pub use extraction::{ExtractionOracle, RawExtraction};
