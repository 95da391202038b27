//! Core term types shared by candidate and requirement profiles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a skill term belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Technical,
    Qualification,
    Certification,
}

impl SkillCategory {
    /// Merge precedence when the same canonical term shows up in more than
    /// one category: certification > qualification > technical.
    pub fn precedence(&self) -> u8 {
        match self {
            SkillCategory::Certification => 2,
            SkillCategory::Qualification => 1,
            SkillCategory::Technical => 0,
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillCategory::Technical => write!(f, "technical"),
            SkillCategory::Qualification => write!(f, "qualification"),
            SkillCategory::Certification => write!(f, "certification"),
        }
    }
}

/// Where a term came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermSource {
    /// Closed-vocabulary hit during canonicalization
    Dictionary,
    /// Named-entity recognition output from an extraction pipeline
    Ner,
    /// Raw extraction oracle output that never hit the vocabulary
    Oracle,
}

/// Academic degree ladder, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeLevel {
    None,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    /// Numeric rank used for "levels below" arithmetic.
    pub fn rank(&self) -> u8 {
        match self {
            DegreeLevel::None => 0,
            DegreeLevel::Associate => 1,
            DegreeLevel::Bachelor => 2,
            DegreeLevel::Master => 3,
            DegreeLevel::Doctorate => 4,
        }
    }

    /// Detects a degree level named inside a canonical qualification term.
    /// Canonicalization has already expanded abbreviations ("b.tech",
    /// "msc", ...) into their long forms, so keyword containment is enough.
    pub fn from_term(canonical: &str) -> Option<DegreeLevel> {
        let term = canonical.to_lowercase();
        if term.contains("doctor") || term.contains("phd") || term.contains("ph.d") {
            Some(DegreeLevel::Doctorate)
        } else if term.contains("master") || term.contains("mba") {
            Some(DegreeLevel::Master)
        } else if term.contains("bachelor") || term.contains("undergraduate") {
            Some(DegreeLevel::Bachelor)
        } else if term.contains("associate degree") || term.contains("associate's") {
            Some(DegreeLevel::Associate)
        } else {
            None
        }
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegreeLevel::None => write!(f, "none"),
            DegreeLevel::Associate => write!(f, "associate"),
            DegreeLevel::Bachelor => write!(f, "bachelor"),
            DegreeLevel::Master => write!(f, "master"),
            DegreeLevel::Doctorate => write!(f, "doctorate"),
        }
    }
}

/// A single canonicalized skill, qualification, or certification term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTerm {
    /// Surface form as the extractor produced it
    pub raw: String,
    /// Lowercased, whitespace-normalized form used for equality
    pub canonical: String,
    pub category: SkillCategory,
    /// Extraction confidence in [0, 1]
    pub confidence: f32,
    pub source: TermSource,
}

impl SkillTerm {
    pub fn new(
        raw: impl Into<String>,
        canonical: impl Into<String>,
        category: SkillCategory,
        confidence: f32,
        source: TermSource,
    ) -> Self {
        SkillTerm {
            raw: raw.into(),
            canonical: canonical.into(),
            category,
            confidence: confidence.clamp(0.0, 1.0),
            source,
        }
    }

    /// Shorthand for a full-confidence vocabulary hit.
    pub fn dictionary(raw: impl Into<String>, canonical: impl Into<String>, category: SkillCategory) -> Self {
        SkillTerm::new(raw, canonical, category, 1.0, TermSource::Dictionary)
    }
}
