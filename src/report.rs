//! Final comparison report assembly

use crate::error::Result;
use crate::processing::matcher::{MatchOutcome, MatchPair};
use crate::processing::rubric::{ScoreBreakdown, ScoreCategory};
use crate::profile::{RequirementProfile, SkillTerm};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Non-score findings a caller needs to interpret the result correctly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// False when semantic matching was skipped for terms that needed it;
    /// `missing` may then overstate the real gaps.
    pub semantic_pass_ran: bool,
    /// Set when the comparison could not run at all (oracle failure) and
    /// the scores are the zero fallback.
    pub error: Option<String>,
    pub notes: Vec<String>,
}

/// Outcome of one requirement-to-candidate comparison.
///
/// `matched` and `missing` partition the requirement skill set in
/// requirement order; candidate surplus is never reported here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub overall_score: f32,
    pub score_breakdown: BTreeMap<ScoreCategory, f32>,
    pub certifications_required: bool,
    pub matched: Vec<MatchPair>,
    pub missing: Vec<SkillTerm>,
    pub diagnostics: Diagnostics,
}

impl ComparisonResult {
    /// Assembles a result from the scored breakdown and the match outcome.
    /// Pure assembly: ordering comes from the matcher, numbers from the
    /// rubric, and the certification flag mirrors the requirement profile.
    pub fn assemble(
        requirement: &RequirementProfile,
        breakdown: ScoreBreakdown,
        outcome: MatchOutcome,
    ) -> ComparisonResult {
        ComparisonResult {
            overall_score: breakdown.overall,
            score_breakdown: breakdown.categories,
            certifications_required: requirement.certifications_required,
            matched: outcome.matched,
            missing: outcome.missing,
            diagnostics: Diagnostics {
                semantic_pass_ran: outcome.semantic_pass_ran,
                error: None,
                notes: outcome.notes,
            },
        }
    }

    /// Zero-score fallback for a failed extraction: the comparison never
    /// ran, so every category scores zero and the diagnostic records why.
    pub fn extraction_failure(message: impl Into<String>) -> ComparisonResult {
        let breakdown = ScoreBreakdown::zeroed(&[
            ScoreCategory::TechnicalSkills,
            ScoreCategory::Qualifications,
            ScoreCategory::Bonuses,
        ]);
        ComparisonResult {
            overall_score: breakdown.overall,
            score_breakdown: breakdown.categories,
            certifications_required: false,
            matched: Vec::new(),
            missing: Vec::new(),
            diagnostics: Diagnostics {
                semantic_pass_ran: false,
                error: Some(message.into()),
                notes: Vec::new(),
            },
        }
    }

    /// Fraction of requirement terms the candidate covered. An empty
    /// requirement set is trivially covered.
    pub fn coverage(&self) -> f32 {
        let total = self.matched.len() + self.missing.len();
        if total == 0 {
            return 1.0;
        }
        self.matched.len() as f32 / total as f32
    }

    pub fn is_failure(&self) -> bool {
        self.diagnostics.error.is_some()
    }

    /// Serializes the result for downstream consumers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
