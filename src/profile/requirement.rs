//! Job requirement profile and derivation of its flags

use crate::processing::vocabulary;
use crate::profile::skill_set::SkillSet;
use crate::profile::term::{DegreeLevel, SkillCategory};
use serde::{Deserialize, Serialize};

/// Everything the rubric needs to know about the job side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub skills: SkillSet,
    pub certifications_required: bool,
    pub min_degree_level: DegreeLevel,
    pub degree_field: Option<String>,
    pub min_experience_years: u32,
}

impl RequirementProfile {
    pub fn new(
        skills: SkillSet,
        certifications_required: bool,
        min_degree_level: DegreeLevel,
        degree_field: Option<String>,
        min_experience_years: u32,
    ) -> Self {
        RequirementProfile {
            skills,
            certifications_required,
            min_degree_level,
            degree_field,
            min_experience_years,
        }
    }

    /// Derives the profile flags from the requirement's own terms:
    /// certifications are required when the set lists at least one
    /// certification, the degree floor is the highest degree the
    /// qualifications name, and the field is the first known study field
    /// they mention.
    pub fn derive(skills: SkillSet, min_experience_years: u32) -> Self {
        let certifications_required = skills
            .in_category(SkillCategory::Certification)
            .next()
            .is_some();
        let min_degree_level = skills.highest_degree_level();
        let degree_field = skills
            .in_category(SkillCategory::Qualification)
            .find_map(|t| vocabulary::field_of(&t.canonical))
            .map(str::to_string);

        RequirementProfile {
            skills,
            certifications_required,
            min_degree_level,
            degree_field,
            min_experience_years,
        }
    }
}
