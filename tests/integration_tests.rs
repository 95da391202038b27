//! Integration tests for the skill matching engine

use skill_matcher::config::Config;
use skill_matcher::error::{Result, SkillMatcherError};
use skill_matcher::oracle::embedding::EmbeddingService;
use skill_matcher::oracle::extraction::{ExtractionOracle, RawExtraction};
use skill_matcher::processing::engine::ComparisonEngine;
use skill_matcher::processing::matcher::MatchType;
use skill_matcher::processing::rubric::ScoreCategory;
use skill_matcher::profile::{
    DegreeLevel, DocumentRole, RequirementProfile, SkillCategory, SkillSet, SkillTerm,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Oracle serving canned payloads keyed by the full document text.
struct FixtureOracle {
    payloads: HashMap<String, RawExtraction>,
}

impl FixtureOracle {
    fn new(payloads: Vec<(&str, RawExtraction)>) -> Self {
        FixtureOracle {
            payloads: payloads
                .into_iter()
                .map(|(text, payload)| (text.to_string(), payload))
                .collect(),
        }
    }
}

impl ExtractionOracle for FixtureOracle {
    fn extract(&self, text: &str, _timeout: Duration) -> Result<RawExtraction> {
        self.payloads
            .get(text)
            .cloned()
            .ok_or_else(|| SkillMatcherError::ExtractionParse(format!("no fixture for '{}'", text)))
    }
}

/// Embedding service with fixed per-term vectors and a call counter.
struct FixtureEmbedding {
    vectors: HashMap<String, Vec<f32>>,
    calls: Arc<AtomicUsize>,
}

impl FixtureEmbedding {
    fn new(entries: &[(&str, [f32; 3])]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = FixtureEmbedding {
            vectors: entries
                .iter()
                .map(|(term, vector)| (term.to_string(), vector.to_vec()))
                .collect(),
            calls: Arc::clone(&calls),
        };
        (service, calls)
    }
}

impl EmbeddingService for FixtureEmbedding {
    fn embed(&self, terms: &[String], _timeout: Duration) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        terms
            .iter()
            .map(|term| {
                self.vectors.get(term).cloned().ok_or_else(|| {
                    SkillMatcherError::EmbeddingService(format!("no fixture vector for '{}'", term))
                })
            })
            .collect()
    }

    fn dimensions(&self) -> usize {
        3
    }
}

fn lists(technical: &[&str], qualifications: &[&str], certifications: &[&str]) -> RawExtraction {
    RawExtraction {
        technical_skills: technical.iter().map(|s| s.to_string()).collect(),
        qualifications: qualifications.iter().map(|s| s.to_string()).collect(),
        certifications: certifications.iter().map(|s| s.to_string()).collect(),
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn exact_only_engine() -> ComparisonEngine {
    init_logs();
    ComparisonEngine::new(Config::default(), Box::new(FixtureOracle::new(Vec::new())), None)
        .unwrap()
}

fn term(canonical: &str, category: SkillCategory) -> SkillTerm {
    SkillTerm::dictionary(canonical, canonical, category)
}

fn requirement_set(terms: Vec<SkillTerm>) -> SkillSet {
    SkillSet::build(DocumentRole::Requirement, terms)
}

fn candidate_set(terms: Vec<SkillTerm>) -> SkillSet {
    SkillSet::build(DocumentRole::Candidate, terms)
}

#[test]
fn test_half_technical_coverage_scores_thirty() {
    let engine = exact_only_engine();
    let requirement = RequirementProfile::derive(
        requirement_set(vec![
            term("python", SkillCategory::Technical),
            term("aws", SkillCategory::Technical),
        ]),
        0,
    );
    let candidate = candidate_set(vec![term("python", SkillCategory::Technical)]);

    let result = engine.compare(&requirement, &candidate, 0);
    assert_eq!(result.score_breakdown[&ScoreCategory::TechnicalSkills], 30.0);
    assert_eq!(result.matched.len(), 1);
    assert_eq!(result.matched[0].requirement_term.canonical, "python");
    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].canonical, "aws");
}

#[test]
fn test_degree_one_level_below_with_exact_field() {
    let engine = exact_only_engine();
    let requirement = RequirementProfile::new(
        requirement_set(vec![]),
        false,
        DegreeLevel::Master,
        Some("computer science".to_string()),
        0,
    );
    let candidate = candidate_set(vec![term(
        "bachelor of science in computer science",
        SkillCategory::Qualification,
    )]);

    let result = engine.compare(&requirement, &candidate, 0);
    let weight = 40.0_f32;
    let level_share = weight * 2.0 / 3.0;
    let expected = level_share / 2.0 + (weight - level_share);
    let actual = result.score_breakdown[&ScoreCategory::Qualifications];
    assert!((actual - expected).abs() < 1e-4, "got {}", actual);
}

#[test]
fn test_experience_surplus_bonus() {
    let engine = exact_only_engine();
    let requirement =
        RequirementProfile::new(requirement_set(vec![]), false, DegreeLevel::None, None, 3);
    let result = engine.compare(&requirement, &candidate_set(vec![]), 6);
    assert_eq!(result.score_breakdown[&ScoreCategory::Bonuses], 6.0);
}

#[test]
fn test_cloud_equivalence_match() {
    let engine = exact_only_engine();
    let requirement = RequirementProfile::derive(
        requirement_set(vec![term("cloud computing", SkillCategory::Technical)]),
        0,
    );
    let candidate = candidate_set(vec![term("aws", SkillCategory::Technical)]);

    let result = engine.compare(&requirement, &candidate, 0);
    assert_eq!(result.matched.len(), 1);
    let pair = &result.matched[0];
    assert_eq!(pair.match_type, MatchType::Equivalent);
    assert_eq!(pair.similarity, 1.0);
    assert_eq!(pair.requirement_term.canonical, "cloud computing");
    assert_eq!(pair.candidate_term.canonical, "aws");
}

#[test]
fn test_no_certification_regime_shape() {
    let engine = exact_only_engine();
    let requirement =
        RequirementProfile::new(requirement_set(vec![]), false, DegreeLevel::None, None, 0);
    let result = engine.compare(&requirement, &candidate_set(vec![]), 0);

    let keys: Vec<ScoreCategory> = result.score_breakdown.keys().copied().collect();
    assert_eq!(
        keys,
        vec![ScoreCategory::TechnicalSkills, ScoreCategory::Qualifications, ScoreCategory::Bonuses]
    );
    // Empty requirements are trivially satisfied at the redistributed maxima.
    assert_eq!(result.score_breakdown[&ScoreCategory::TechnicalSkills], 60.0);
    assert_eq!(result.score_breakdown[&ScoreCategory::Qualifications], 40.0);
    assert!(!result.certifications_required);
}

#[test]
fn test_certification_regime_scores_required_and_surplus() {
    let engine = exact_only_engine();
    let requirement = RequirementProfile::derive(
        requirement_set(vec![
            term("python", SkillCategory::Technical),
            term("pmp", SkillCategory::Certification),
        ]),
        0,
    );
    assert!(requirement.certifications_required);

    let candidate = candidate_set(vec![
        term("python", SkillCategory::Technical),
        term("pmp", SkillCategory::Certification),
        term("cisa", SkillCategory::Certification),
    ]);
    let result = engine.compare(&requirement, &candidate, 0);

    // Full required budget plus one surplus certification share.
    assert_eq!(result.score_breakdown[&ScoreCategory::Certifications], 17.5);
    assert_eq!(result.score_breakdown[&ScoreCategory::TechnicalSkills], 50.0);
    assert!(result.certifications_required);
}

#[test]
fn test_overall_score_stays_in_bounds() {
    let engine = exact_only_engine();

    // Worst case: nothing matches, degree far below floor.
    let demanding = RequirementProfile::new(
        requirement_set(vec![
            term("rust", SkillCategory::Technical),
            term("scala", SkillCategory::Technical),
        ]),
        false,
        DegreeLevel::Doctorate,
        Some("physics".to_string()),
        10,
    );
    let weak = engine.compare(&demanding, &candidate_set(vec![]), 0);
    assert!(weak.overall_score >= 0.0 && weak.overall_score <= 100.0);
    assert_eq!(weak.overall_score, 0.0);

    // Best case: categories sum past 100 before the clamp.
    let trivial =
        RequirementProfile::new(requirement_set(vec![]), true, DegreeLevel::None, None, 0);
    let strong = engine.compare(
        &trivial,
        &candidate_set(vec![
            term("pmp", SkillCategory::Certification),
            term("cisa", SkillCategory::Certification),
        ]),
        10,
    );
    let sum: f32 = strong.score_breakdown.values().sum();
    assert!(sum > 100.0);
    assert_eq!(strong.overall_score, 100.0);
}

#[test]
fn test_matched_and_missing_partition_requirements() {
    let engine = exact_only_engine();
    let requirement = RequirementProfile::derive(
        requirement_set(vec![
            term("python", SkillCategory::Technical),
            term("terraform", SkillCategory::Technical),
            term("cloud computing", SkillCategory::Technical),
            term("pmp", SkillCategory::Certification),
        ]),
        0,
    );
    let candidate = candidate_set(vec![
        term("python", SkillCategory::Technical),
        term("gcp", SkillCategory::Technical),
    ]);

    let result = engine.compare(&requirement, &candidate, 0);
    assert_eq!(result.matched.len() + result.missing.len(), requirement.skills.len());
    for pair in &result.matched {
        assert!(requirement.skills.contains_canonical(&pair.requirement_term.canonical));
    }
    for missing in &result.missing {
        assert!(requirement.skills.contains_canonical(&missing.canonical));
    }
}

#[test]
fn test_degraded_mode_is_annotated() {
    let engine = exact_only_engine();
    let requirement = RequirementProfile::derive(
        requirement_set(vec![term("terraform", SkillCategory::Technical)]),
        0,
    );
    let candidate = candidate_set(vec![term("ansible", SkillCategory::Technical)]);

    let result = engine.compare(&requirement, &candidate, 0);
    assert!(!result.diagnostics.semantic_pass_ran);
    assert!(result
        .diagnostics
        .notes
        .iter()
        .any(|note| note.contains("no embedding service")));
    assert_eq!(result.missing.len(), 1);
}

#[test]
fn test_comparison_is_bit_identical_across_calls() {
    init_logs();
    let (service, _) = FixtureEmbedding::new(&[
        ("react", [1.0, 0.0, 0.0]),
        ("vue", [0.9, 0.1, 0.0]),
        ("python", [0.0, 1.0, 0.0]),
    ]);
    let engine = ComparisonEngine::new(
        Config::default(),
        Box::new(FixtureOracle::new(Vec::new())),
        Some(Box::new(service)),
    )
    .unwrap();

    let requirement = RequirementProfile::derive(
        requirement_set(vec![
            term("react", SkillCategory::Technical),
            term("python", SkillCategory::Technical),
        ]),
        2,
    );
    let candidate = candidate_set(vec![
        term("vue", SkillCategory::Technical),
        term("python", SkillCategory::Technical),
    ]);

    let first = engine.compare(&requirement, &candidate, 5);
    let second = engine.compare(&requirement, &candidate, 5);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_semantic_match_survives_to_report() {
    init_logs();
    let (service, calls) = FixtureEmbedding::new(&[
        ("react", [1.0, 0.0, 0.0]),
        ("vue", [0.9, 0.1, 0.0]),
    ]);
    let engine = ComparisonEngine::new(
        Config::default(),
        Box::new(FixtureOracle::new(vec![
            ("job", lists(&["React"], &[], &[])),
            ("resume", lists(&["Vue"], &[], &[])),
        ])),
        Some(Box::new(service)),
    )
    .unwrap();

    let result = engine.evaluate_documents("job", "resume", 0, 0);
    assert!(result.diagnostics.semantic_pass_ran);
    assert_eq!(result.matched.len(), 1);
    let pair = &result.matched[0];
    assert_eq!(pair.match_type, MatchType::Semantic);
    assert!(pair.similarity >= 0.7 && pair.similarity <= 1.0);
    assert_eq!(result.score_breakdown[&ScoreCategory::TechnicalSkills], 60.0);
    assert_eq!(result.overall_score, 100.0);

    // A second comparison reuses every cached vector.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let again = engine.evaluate_documents("job", "resume", 0, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(again, result);
}

#[test]
fn test_extraction_failure_yields_zero_result() {
    let engine = exact_only_engine();
    let result = engine.evaluate_documents("unknown job", "unknown resume", 0, 0);

    assert!(result.is_failure());
    assert_eq!(result.overall_score, 0.0);
    assert!(result.score_breakdown.values().all(|&v| v == 0.0));
    assert!(!result.score_breakdown.contains_key(&ScoreCategory::Certifications));
    assert!(result.matched.is_empty());
    assert!(result.missing.is_empty());
    assert!(result
        .diagnostics
        .error
        .as_deref()
        .unwrap()
        .contains("requirement extraction failed"));
}

#[test]
fn test_canonicalization_flows_through_pipeline() {
    init_logs();
    let engine = ComparisonEngine::new(
        Config::default(),
        Box::new(FixtureOracle::new(vec![
            ("job", lists(&["AI/ML", "REST APIs"], &[], &[])),
            (
                "resume",
                lists(
                    &["machine learning", "rest api", "artificial intelligence", "ai"],
                    &[],
                    &[],
                ),
            ),
        ])),
        None,
    )
    .unwrap();

    let result = engine.evaluate_documents("job", "resume", 0, 0);
    // "AI/ML" splits and expands into ai, artificial intelligence, ml,
    // machine learning; "REST APIs" plural-strips to rest api. Only "ml"
    // has no candidate counterpart without a semantic pass.
    assert_eq!(result.matched.len(), 4);
    assert_eq!(result.missing.len(), 1);
    assert_eq!(result.missing[0].canonical, "ml");
    assert_eq!(result.score_breakdown[&ScoreCategory::TechnicalSkills], 48.0);
}

#[test]
fn test_report_serializes_the_data_contract() {
    let engine = exact_only_engine();
    let requirement = RequirementProfile::derive(
        requirement_set(vec![
            term("cloud computing", SkillCategory::Technical),
            term("terraform", SkillCategory::Technical),
        ]),
        0,
    );
    let candidate = candidate_set(vec![term("aws", SkillCategory::Technical)]);

    let result = engine.compare(&requirement, &candidate, 0);
    let json = result.to_json().unwrap();
    assert!(json.contains("\"overall_score\""));
    assert!(json.contains("\"score_breakdown\""));
    assert!(json.contains("\"technical_skills\""));
    assert!(json.contains("\"match_type\": \"equivalent\""));
    assert!(json.contains("\"semantic_pass_ran\": false"));

    let parsed: skill_matcher::ComparisonResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}
