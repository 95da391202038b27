//! Canonicalization, matching, and scoring pipeline

pub mod canonicalizer;
pub mod engine;
pub mod matcher;
pub mod rubric;
pub mod vocabulary;
