//! Candidate and requirement profile data model

pub mod requirement;
pub mod skill_set;
pub mod term;

pub use requirement::RequirementProfile;
pub use skill_set::{DocumentRole, SkillSet};
pub use term::{DegreeLevel, SkillCategory, SkillTerm, TermSource};
