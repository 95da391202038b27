//! Skill matching and scoring engine library

pub mod config;
pub mod error;
pub mod oracle;
pub mod processing;
pub mod profile;
pub mod report;

pub use config::Config;
pub use error::{Result, SkillMatcherError};
pub use processing::engine::ComparisonEngine;
pub use report::ComparisonResult;
