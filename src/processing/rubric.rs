//! Weighted rubric scoring over a match outcome

use crate::config::ScoringConfig;
use crate::processing::matcher::MatchPair;
use crate::processing::vocabulary;
use crate::profile::{DegreeLevel, RequirementProfile, SkillCategory, SkillSet, SkillTerm};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Scoring categories, in breakdown order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    TechnicalSkills,
    Qualifications,
    Certifications,
    Bonuses,
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreCategory::TechnicalSkills => write!(f, "technical_skills"),
            ScoreCategory::Qualifications => write!(f, "qualifications"),
            ScoreCategory::Certifications => write!(f, "certifications"),
            ScoreCategory::Bonuses => write!(f, "bonuses"),
        }
    }
}

/// Per-category scores plus their clamped sum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub categories: BTreeMap<ScoreCategory, f32>,
    pub overall: f32,
}

impl ScoreBreakdown {
    /// All-zero breakdown over the given categories, for failure results.
    pub fn zeroed(categories: &[ScoreCategory]) -> ScoreBreakdown {
        ScoreBreakdown {
            categories: categories.iter().map(|&c| (c, 0.0)).collect(),
            overall: 0.0,
        }
    }
}

/// Category maxima active for one comparison. `certifications` is `None`
/// when the requirement needs no certifications and the weight has been
/// redistributed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRegime {
    pub technical: f32,
    pub qualifications: f32,
    pub certifications: Option<f32>,
    pub bonus: f32,
}

impl WeightRegime {
    /// Selects the active regime before any category is scored. When no
    /// certifications are required, the certification weight splits evenly
    /// between technical skills and qualifications and the certification
    /// category disappears from the breakdown.
    pub fn select(config: &ScoringConfig, certifications_required: bool) -> WeightRegime {
        if certifications_required {
            WeightRegime {
                technical: config.technical_weight,
                qualifications: config.qualification_weight,
                certifications: Some(config.certification_weight),
                bonus: config.bonus_weight,
            }
        } else {
            let half = config.certification_weight / 2.0;
            WeightRegime {
                technical: config.technical_weight + half,
                qualifications: config.qualification_weight + half,
                certifications: None,
                bonus: config.bonus_weight,
            }
        }
    }
}

/// Computes the category breakdown and overall score for one comparison.
///
/// Every division by a requirement count guards the zero case by awarding
/// the full category weight: an empty requirement is trivially satisfied.
pub struct RubricEngine {
    config: ScoringConfig,
}

impl RubricEngine {
    pub fn new(config: &ScoringConfig) -> Self {
        RubricEngine { config: config.clone() }
    }

    /// Scores one comparison. `matched` and `missing` must partition the
    /// requirement skill set; `candidate` supplies the degree terms and
    /// surplus certifications the category formulas read.
    pub fn score(
        &self,
        requirement: &RequirementProfile,
        candidate: &SkillSet,
        matched: &[MatchPair],
        missing: &[SkillTerm],
        candidate_experience_years: u32,
    ) -> ScoreBreakdown {
        let regime = WeightRegime::select(&self.config, requirement.certifications_required);
        debug!(
            "Scoring with regime: technical {}, qualifications {}, certifications {:?}, bonus {}",
            regime.technical, regime.qualifications, regime.certifications, regime.bonus
        );

        let mut categories = BTreeMap::new();
        categories.insert(
            ScoreCategory::TechnicalSkills,
            self.technical_score(regime.technical, matched, missing)
                .clamp(0.0, regime.technical),
        );
        categories.insert(
            ScoreCategory::Qualifications,
            self.qualification_score(regime.qualifications, requirement, candidate)
                .clamp(0.0, regime.qualifications),
        );
        if let Some(weight) = regime.certifications {
            categories.insert(
                ScoreCategory::Certifications,
                self.certification_score(weight, candidate, matched, missing)
                    .clamp(0.0, weight),
            );
        }
        categories.insert(
            ScoreCategory::Bonuses,
            self.experience_bonus(
                regime.bonus,
                requirement.min_experience_years,
                candidate_experience_years,
            )
            .clamp(0.0, regime.bonus),
        );

        let overall = categories.values().sum::<f32>().clamp(0.0, 100.0);
        ScoreBreakdown { categories, overall }
    }

    /// Coverage of technical requirement terms, scaled to the category
    /// weight. Zero technical requirements award the full weight.
    fn technical_score(&self, weight: f32, matched: &[MatchPair], missing: &[SkillTerm]) -> f32 {
        let matched_count = matched
            .iter()
            .filter(|p| p.requirement_term.category == SkillCategory::Technical)
            .count();
        let required_count = matched_count
            + missing
                .iter()
                .filter(|t| t.category == SkillCategory::Technical)
                .count();

        if required_count == 0 {
            return weight;
        }
        matched_count as f32 / required_count as f32 * weight
    }

    /// Degree level carries two thirds of the category weight, field
    /// relevance the remaining third. One level below the floor halves the
    /// level share; two or more levels below zeroes the whole category,
    /// field proximity included.
    fn qualification_score(
        &self,
        weight: f32,
        requirement: &RequirementProfile,
        candidate: &SkillSet,
    ) -> f32 {
        let level_share = weight * 2.0 / 3.0;
        let field_share = weight - level_share;

        let required_level = requirement.min_degree_level;
        let candidate_level = candidate.highest_degree_level();

        let level_score = if candidate_level >= required_level {
            level_share
        } else if required_level.rank() - candidate_level.rank() == 1 {
            level_share / 2.0
        } else {
            0.0
        };

        if level_score == 0.0 {
            return 0.0;
        }

        let field_score = match requirement.degree_field.as_deref() {
            // No field requirement: any degree that clears the level floor
            // earns the full field share.
            None => field_share,
            Some(required_field) => match candidate_degree_field(candidate) {
                Some(candidate_field) if candidate_field.eq_ignore_ascii_case(required_field) => {
                    field_share
                }
                Some(candidate_field)
                    if self.fields_are_related(candidate_field, required_field) =>
                {
                    field_share / 2.0
                }
                _ => 0.0,
            },
        };

        level_score + field_score
    }

    fn fields_are_related(&self, a: &str, b: &str) -> bool {
        self.config.related_field_groups.iter().any(|group| {
            group.iter().any(|f| f.eq_ignore_ascii_case(a))
                && group.iter().any(|f| f.eq_ignore_ascii_case(b))
        })
    }

    /// Required certification coverage fills the reserved budget; candidate
    /// certifications left over after matching add a fixed share each, up
    /// to the remainder of the category weight.
    fn certification_score(
        &self,
        weight: f32,
        candidate: &SkillSet,
        matched: &[MatchPair],
        missing: &[SkillTerm],
    ) -> f32 {
        let required_budget = self.config.required_certification_budget.min(weight);
        let bonus_budget = weight - required_budget;

        let matched_required: Vec<&MatchPair> = matched
            .iter()
            .filter(|p| p.requirement_term.category == SkillCategory::Certification)
            .collect();
        let required_count = matched_required.len()
            + missing
                .iter()
                .filter(|t| t.category == SkillCategory::Certification)
                .count();

        let required_score = if required_count == 0 {
            required_budget
        } else {
            matched_required.len() as f32 / required_count as f32 * required_budget
        };

        // A candidate certification already credited through any matched
        // pair never double-counts as a bonus.
        let consumed: HashSet<&str> = matched
            .iter()
            .map(|p| p.candidate_term.canonical.as_str())
            .collect();
        let surplus = candidate
            .in_category(SkillCategory::Certification)
            .filter(|t| !consumed.contains(t.canonical.as_str()))
            .count();
        let bonus_score = (surplus as f32 * self.config.bonus_certification_share).min(bonus_budget);

        required_score + bonus_score
    }

    /// Experience years beyond the requirement, capped, at a fixed rate.
    fn experience_bonus(&self, weight: f32, required_years: u32, candidate_years: u32) -> f32 {
        let surplus = candidate_years
            .saturating_sub(required_years)
            .min(self.config.experience_surplus_cap_years);
        (surplus as f32 * self.config.experience_bonus_per_year).min(weight)
    }
}

/// First known study field named by the candidate's qualification terms.
fn candidate_degree_field(candidate: &SkillSet) -> Option<&str> {
    candidate
        .in_category(SkillCategory::Qualification)
        .find_map(|t| vocabulary::field_of(&t.canonical))
}
