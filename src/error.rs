//! Error handling for the skill matching engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction payload rejected: {0}")]
    ExtractionParse(String),

    #[error("Extraction service error: {0}")]
    ExtractionService(String),

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimension { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SkillMatcherError>;

impl SkillMatcherError {
    /// Only connectivity failures are worth retrying; everything else is a
    /// contract violation that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SkillMatcherError::ExtractionService(_) | SkillMatcherError::EmbeddingService(_)
        )
    }
}
