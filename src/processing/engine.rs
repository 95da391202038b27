//! Comparison engine wiring the pipeline stages together

use crate::config::Config;
use crate::error::{Result, SkillMatcherError};
use crate::oracle::embedding::{CachedEmbedder, EmbeddingService};
use crate::oracle::extraction::{extract_with_policy, ExtractionOracle};
use crate::processing::canonicalizer::TermCanonicalizer;
use crate::processing::matcher::SemanticMatcher;
use crate::processing::rubric::RubricEngine;
use crate::profile::{DocumentRole, RequirementProfile, SkillSet};
use crate::report::ComparisonResult;
use log::{info, warn};

/// One-stop comparison pipeline: canonicalization, matching, scoring,
/// report assembly. Collaborators are injected; the engine never reaches
/// for process-wide clients.
///
/// The engine is stateless per comparison and safe to share across threads;
/// the only cross-call state is the write-once embedding cache.
pub struct ComparisonEngine {
    config: Config,
    canonicalizer: TermCanonicalizer,
    matcher: SemanticMatcher,
    rubric: RubricEngine,
    oracle: Box<dyn ExtractionOracle>,
    embedder: Option<CachedEmbedder>,
}

impl ComparisonEngine {
    /// Builds an engine from a validated configuration and injected
    /// collaborators. Passing no embedding service degrades matching to the
    /// exact and equivalence passes, annotated on every result.
    pub fn new(
        config: Config,
        oracle: Box<dyn ExtractionOracle>,
        embedding: Option<Box<dyn EmbeddingService>>,
    ) -> Result<ComparisonEngine> {
        config.validate()?;
        let canonicalizer = TermCanonicalizer::new(&config.canonicalization)?;
        let matcher = SemanticMatcher::new(&config.matching);
        let rubric = RubricEngine::new(&config.scoring);
        let embedder = embedding.map(|service| {
            CachedEmbedder::new(
                service,
                config.collaborators.request_timeout(),
                config.collaborators.max_retries,
            )
        });
        if embedder.is_none() {
            warn!("No embedding service configured; semantic matching is disabled");
        }

        Ok(ComparisonEngine {
            config,
            canonicalizer,
            matcher,
            rubric,
            oracle,
            embedder,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compares a candidate skill set against a requirement profile.
    ///
    /// Total over its inputs: matching degradations surface as diagnostics
    /// on the result, never as errors. Identical inputs with an unchanged
    /// embedding cache produce identical results.
    pub fn compare(
        &self,
        requirement: &RequirementProfile,
        candidate: &SkillSet,
        candidate_experience_years: u32,
    ) -> ComparisonResult {
        let outcome =
            self.matcher
                .match_skills(&requirement.skills, candidate, self.embedder.as_ref());
        let breakdown = self.rubric.score(
            requirement,
            candidate,
            &outcome.matched,
            &outcome.missing,
            candidate_experience_years,
        );
        info!(
            "Compared {} requirement terms: {} matched, {} missing, overall {:.1}",
            requirement.skills.len(),
            outcome.matched.len(),
            outcome.missing.len(),
            breakdown.overall
        );
        ComparisonResult::assemble(requirement, breakdown, outcome)
    }

    /// Extracts and canonicalizes one document into a skill set. Blank
    /// text is rejected before the oracle is invoked.
    pub fn extract_skill_set(&self, text: &str, role: DocumentRole) -> Result<SkillSet> {
        if text.trim().is_empty() {
            return Err(SkillMatcherError::InvalidInput(
                "document text is empty".to_string(),
            ));
        }
        let extraction = extract_with_policy(self.oracle.as_ref(), text, &self.config.collaborators)?;
        let terms = self.canonicalizer.canonicalize_extraction(&extraction);
        Ok(SkillSet::build(role, terms))
    }

    /// Extracts a requirement document and derives its profile flags from
    /// the canonicalized terms.
    pub fn derive_requirement(
        &self,
        text: &str,
        min_experience_years: u32,
    ) -> Result<RequirementProfile> {
        let skills = self.extract_skill_set(text, DocumentRole::Requirement)?;
        Ok(RequirementProfile::derive(skills, min_experience_years))
    }

    /// Runs the whole pipeline from raw document text on both sides.
    ///
    /// Extraction failures (malformed payloads, connectivity exhausted past
    /// the retry budget) come back as a zero-score result carrying the
    /// error, so the call is total.
    pub fn evaluate_documents(
        &self,
        requirement_text: &str,
        candidate_text: &str,
        min_experience_years: u32,
        candidate_experience_years: u32,
    ) -> ComparisonResult {
        let requirement = match self.derive_requirement(requirement_text, min_experience_years) {
            Ok(requirement) => requirement,
            Err(e) => {
                warn!("Requirement extraction failed: {}", e);
                return ComparisonResult::extraction_failure(format!(
                    "requirement extraction failed: {}",
                    e
                ));
            }
        };
        let candidate = match self.extract_skill_set(candidate_text, DocumentRole::Candidate) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Candidate extraction failed: {}", e);
                return ComparisonResult::extraction_failure(format!(
                    "candidate extraction failed: {}",
                    e
                ));
            }
        };
        self.compare(&requirement, &candidate, candidate_experience_years)
    }
}
