//! Insertion-ordered, deduplicated term collections owned by one document

use crate::profile::term::{DegreeLevel, SkillCategory, SkillTerm, TermSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which side of the comparison a skill set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentRole {
    Candidate,
    Requirement,
}

/// An immutable collection of unique skill terms in first-occurrence order.
///
/// Uniqueness is by canonical form. Duplicate inputs are merged at build
/// time: the earliest occurrence keeps its position, the highest-confidence
/// instance supplies the surface form, and the category resolves by
/// precedence (certification > qualification > technical).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    role: DocumentRole,
    terms: Vec<SkillTerm>,
}

impl SkillSet {
    /// Builds a deduplicated set from canonicalized terms.
    pub fn build(role: DocumentRole, terms: Vec<SkillTerm>) -> SkillSet {
        let mut ordered: Vec<SkillTerm> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for term in terms {
            match seen.get(&term.canonical) {
                None => {
                    seen.insert(term.canonical.clone(), ordered.len());
                    ordered.push(term);
                }
                Some(&pos) => {
                    let existing = &mut ordered[pos];
                    if term.category.precedence() > existing.category.precedence() {
                        existing.category = term.category;
                    }
                    let any_dictionary = existing.source == TermSource::Dictionary
                        || term.source == TermSource::Dictionary;
                    if term.confidence > existing.confidence {
                        existing.raw = term.raw;
                        existing.confidence = term.confidence;
                        existing.source = term.source;
                    }
                    if any_dictionary {
                        existing.source = TermSource::Dictionary;
                    }
                }
            }
        }

        SkillSet { role, terms: ordered }
    }

    /// Empty set for the given role.
    pub fn empty(role: DocumentRole) -> SkillSet {
        SkillSet { role, terms: Vec::new() }
    }

    pub fn role(&self) -> DocumentRole {
        self.role
    }

    pub fn terms(&self) -> &[SkillTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillTerm> {
        self.terms.iter()
    }

    pub fn get(&self, canonical: &str) -> Option<&SkillTerm> {
        self.terms.iter().find(|t| t.canonical == canonical)
    }

    pub fn contains_canonical(&self, canonical: &str) -> bool {
        self.get(canonical).is_some()
    }

    /// Position of a canonical form in insertion order.
    pub fn position(&self, canonical: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.canonical == canonical)
    }

    pub fn in_category(&self, category: SkillCategory) -> impl Iterator<Item = &SkillTerm> {
        self.terms.iter().filter(move |t| t.category == category)
    }

    pub fn count_in_category(&self, category: SkillCategory) -> usize {
        self.in_category(category).count()
    }

    /// Highest degree level named by any qualification term, or
    /// `DegreeLevel::None` when the set names no degree.
    pub fn highest_degree_level(&self) -> DegreeLevel {
        self.in_category(SkillCategory::Qualification)
            .filter_map(|t| DegreeLevel::from_term(&t.canonical))
            .max()
            .unwrap_or(DegreeLevel::None)
    }
}
