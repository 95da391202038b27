//! Configuration management for the skill matching engine

use crate::error::{Result, SkillMatcherError};
use crate::profile::term::SkillCategory;
use crate::processing::vocabulary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub matching: MatchingConfig,
    pub canonicalization: CanonicalizationConfig,
    pub collaborators: CollaboratorConfig,
}

/// Weight table and rubric knobs. The four category weights form the base
/// regime; when certifications are not required their weight is split evenly
/// between technical skills and qualifications before any scoring happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub technical_weight: f32,
    pub qualification_weight: f32,
    pub certification_weight: f32,
    pub bonus_weight: f32,
    /// Portion of the certification weight reserved for required matches
    pub required_certification_budget: f32,
    /// Points each surplus candidate certification adds, capped at the
    /// remainder of the certification weight
    pub bonus_certification_share: f32,
    pub experience_bonus_per_year: f32,
    pub experience_surplus_cap_years: u32,
    /// Study fields inside one group count as related (half field credit)
    pub related_field_groups: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Cosine similarity floor for the semantic pass
    pub similarity_threshold: f32,
    pub equivalence_classes: Vec<EquivalenceClass>,
}

/// A named group of terms treated as interchangeable at match time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceClass {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalizationConfig {
    pub max_term_chars: usize,
    pub max_term_words: usize,
    /// Confidence assigned to terms that never hit the vocabulary
    pub default_confidence: f32,
    /// Confidence assigned to NER-sourced terms outside the vocabulary
    pub ner_confidence: f32,
    pub extra_vocabulary: Vec<VocabularyEntry>,
    pub extra_acronyms: Vec<AcronymRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub term: String,
    pub category: SkillCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcronymRule {
    pub short: String,
    pub expansion: String,
}

/// Timeout and retry policy for the extraction and embedding collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorConfig {
    pub request_timeout_secs: u64,
    pub max_retries: u32,
}

impl CollaboratorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig {
                technical_weight: 50.0,
                qualification_weight: 30.0,
                certification_weight: 20.0,
                bonus_weight: 10.0,
                required_certification_budget: 15.0,
                bonus_certification_share: 2.5,
                experience_bonus_per_year: 2.0,
                experience_surplus_cap_years: 5,
                related_field_groups: vocabulary::default_related_field_groups()
                    .iter()
                    .map(|group| group.iter().map(|f| f.to_string()).collect())
                    .collect(),
            },
            matching: MatchingConfig {
                similarity_threshold: 0.7,
                equivalence_classes: vocabulary::default_equivalence_groups()
                    .iter()
                    .map(|(name, members)| EquivalenceClass {
                        name: name.to_string(),
                        members: members.iter().map(|m| m.to_string()).collect(),
                    })
                    .collect(),
            },
            canonicalization: CanonicalizationConfig {
                max_term_chars: 64,
                max_term_words: 6,
                default_confidence: 0.6,
                ner_confidence: 0.8,
                extra_vocabulary: Vec::new(),
                extra_acronyms: Vec::new(),
            },
            collaborators: CollaboratorConfig {
                request_timeout_secs: 30,
                max_retries: 2,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| SkillMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.scoring;
        for (name, value) in [
            ("technical_weight", s.technical_weight),
            ("qualification_weight", s.qualification_weight),
            ("certification_weight", s.certification_weight),
            ("bonus_weight", s.bonus_weight),
            ("required_certification_budget", s.required_certification_budget),
            ("bonus_certification_share", s.bonus_certification_share),
            ("experience_bonus_per_year", s.experience_bonus_per_year),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SkillMatcherError::Configuration(format!(
                    "scoring.{} must be a nonnegative number, got {}",
                    name, value
                )));
            }
        }
        if s.required_certification_budget > s.certification_weight {
            return Err(SkillMatcherError::Configuration(format!(
                "required_certification_budget ({}) exceeds certification_weight ({})",
                s.required_certification_budget, s.certification_weight
            )));
        }
        let threshold = self.matching.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SkillMatcherError::Configuration(format!(
                "matching.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.canonicalization.max_term_chars == 0 || self.canonicalization.max_term_words == 0 {
            return Err(SkillMatcherError::Configuration(
                "canonicalization length bounds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Config::default().scoring
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Config::default().matching
    }
}

impl Default for CanonicalizationConfig {
    fn default() -> Self {
        Config::default().canonicalization
    }
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Config::default().collaborators
    }
}
