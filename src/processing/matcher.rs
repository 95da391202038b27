//! Requirement-to-candidate skill matching with semantic fallback

use crate::config::MatchingConfig;
use crate::oracle::embedding::{cosine_similarity, CachedEmbedder};
use crate::profile::{SkillSet, SkillTerm};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a requirement term was matched to a candidate term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Equivalent,
    Semantic,
}

/// One resolved requirement term. Exact and equivalent matches always carry
/// similarity 1.0; semantic matches carry the winning cosine similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub requirement_term: SkillTerm,
    pub candidate_term: SkillTerm,
    pub similarity: f32,
    pub match_type: MatchType,
}

/// Full matching result for one comparison. `matched` and `missing`
/// partition the requirement set exactly, in requirement order.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matched: Vec<MatchPair>,
    pub missing: Vec<SkillTerm>,
    /// False when the semantic stage was skipped for terms that needed it,
    /// in which case `missing` may overstate the real gaps.
    pub semantic_pass_ran: bool,
    pub notes: Vec<String>,
}

/// Matches requirement terms against candidate terms in three stages:
/// exact canonical equality, configured equivalence classes, then cosine
/// similarity over embeddings with a fixed threshold.
pub struct SemanticMatcher {
    similarity_threshold: f32,
    class_index: HashMap<String, usize>,
    class_names: Vec<String>,
}

impl SemanticMatcher {
    pub fn new(config: &MatchingConfig) -> Self {
        let mut class_index = HashMap::new();
        let mut class_names = Vec::with_capacity(config.equivalence_classes.len());
        for (idx, class) in config.equivalence_classes.iter().enumerate() {
            class_names.push(class.name.clone());
            for member in &class.members {
                // A term listed in two classes stays with the first class.
                class_index.entry(member.to_lowercase()).or_insert(idx);
            }
        }
        SemanticMatcher {
            similarity_threshold: config.similarity_threshold,
            class_index,
            class_names,
        }
    }

    /// Resolves every requirement term to a match or to missing.
    ///
    /// Identical inputs and an unchanged embedding cache always produce an
    /// identical outcome. Candidate terms are never consumed: one candidate
    /// term may satisfy several requirement terms.
    pub fn match_skills(
        &self,
        requirement: &SkillSet,
        candidate: &SkillSet,
        embedder: Option<&CachedEmbedder>,
    ) -> MatchOutcome {
        let mut slots: Vec<Option<MatchPair>> = vec![None; requirement.len()];
        let mut pending: Vec<usize> = Vec::new();
        let mut notes: Vec<String> = Vec::new();

        for (idx, req) in requirement.iter().enumerate() {
            if let Some(cand) = candidate.iter().find(|c| c.canonical == req.canonical) {
                slots[idx] = Some(MatchPair {
                    requirement_term: req.clone(),
                    candidate_term: cand.clone(),
                    similarity: 1.0,
                    match_type: MatchType::Exact,
                });
                continue;
            }

            if let Some(pair) = self.find_equivalent(req, candidate) {
                slots[idx] = Some(pair);
                continue;
            }

            pending.push(idx);
        }

        let semantic_pass_ran =
            self.semantic_pass(requirement, candidate, embedder, &pending, &mut slots, &mut notes);

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for (idx, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(pair) => matched.push(pair),
                None => {
                    if let Some(req) = requirement.terms().get(idx) {
                        missing.push(req.clone());
                    }
                }
            }
        }

        MatchOutcome { matched, missing, semantic_pass_ran, notes }
    }

    /// Equivalence stage for one requirement term: first candidate (in set
    /// order) sharing the requirement term's equivalence class.
    fn find_equivalent(&self, req: &SkillTerm, candidate: &SkillSet) -> Option<MatchPair> {
        let class = self.class_index.get(req.canonical.as_str())?;
        let cand = candidate
            .iter()
            .find(|c| self.class_index.get(c.canonical.as_str()) == Some(class))?;
        debug!(
            "Equivalence match: '{}' ~ '{}' via class '{}'",
            req.canonical, cand.canonical, self.class_names[*class]
        );
        Some(MatchPair {
            requirement_term: req.clone(),
            candidate_term: cand.clone(),
            similarity: 1.0,
            match_type: MatchType::Equivalent,
        })
    }

    /// Semantic stage over the requirement terms the earlier stages left
    /// unresolved. Returns false when the stage was skipped for terms that
    /// needed it (no embedding service, or the batched request failed);
    /// unresolved slots then fall through to `missing`.
    fn semantic_pass(
        &self,
        requirement: &SkillSet,
        candidate: &SkillSet,
        embedder: Option<&CachedEmbedder>,
        pending: &[usize],
        slots: &mut [Option<MatchPair>],
        notes: &mut Vec<String>,
    ) -> bool {
        if pending.is_empty() {
            return true;
        }
        if candidate.is_empty() {
            return true;
        }
        let embedder = match embedder {
            Some(embedder) => embedder,
            None => {
                notes.push("semantic pass skipped: no embedding service configured".to_string());
                return false;
            }
        };

        // One batched request per comparison covers every vector the stage
        // can touch; the cache absorbs repeats across comparisons.
        let mut wanted: Vec<String> = pending
            .iter()
            .filter_map(|&idx| requirement.terms().get(idx))
            .map(|t| t.canonical.clone())
            .collect();
        wanted.extend(candidate.iter().map(|t| t.canonical.clone()));

        let vectors = match embedder.embed_all(&wanted) {
            Ok(vectors) => vectors,
            Err(e) => {
                notes.push(format!("semantic pass skipped: {}", e));
                return false;
            }
        };

        for &idx in pending {
            let req = match requirement.terms().get(idx) {
                Some(req) => req,
                None => continue,
            };
            let req_vector = match vectors.get(&req.canonical) {
                Some(vector) => vector,
                None => {
                    notes.push(format!("no embedding returned for '{}'", req.canonical));
                    continue;
                }
            };

            let mut best: Option<&SkillTerm> = None;
            let mut best_similarity = f32::NEG_INFINITY;
            let mut best_category_match = false;

            for cand in candidate.iter() {
                let cand_vector = match vectors.get(&cand.canonical) {
                    Some(vector) => vector,
                    None => {
                        notes.push(format!("no embedding returned for '{}'", cand.canonical));
                        continue;
                    }
                };
                let similarity = match cosine_similarity(req_vector, cand_vector) {
                    Ok(similarity) => similarity,
                    Err(e) => {
                        notes.push(format!(
                            "similarity between '{}' and '{}' failed: {}",
                            req.canonical, cand.canonical, e
                        ));
                        continue;
                    }
                };

                // Ties at the maximum prefer a matching category, then the
                // earliest candidate in set order.
                let category_match = cand.category == req.category;
                let better = best.is_none()
                    || similarity > best_similarity
                    || (similarity == best_similarity && category_match && !best_category_match);
                if better {
                    best = Some(cand);
                    best_similarity = similarity;
                    best_category_match = category_match;
                }
            }

            if let Some(cand) = best {
                if best_similarity >= self.similarity_threshold {
                    debug!(
                        "Semantic match: '{}' ~ '{}' at {:.3}",
                        req.canonical, cand.canonical, best_similarity
                    );
                    slots[idx] = Some(MatchPair {
                        requirement_term: req.clone(),
                        candidate_term: cand.clone(),
                        similarity: best_similarity.clamp(0.0, 1.0),
                        match_type: MatchType::Semantic,
                    });
                }
            }
        }

        true
    }
}
