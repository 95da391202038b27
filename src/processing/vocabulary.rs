//! Built-in closed vocabulary, acronym table, and equivalence data

use crate::profile::term::SkillCategory;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical vocabulary entries with their default category.
///
/// The table is intentionally broad but not exhaustive; deployments extend it
/// through `CanonicalizationConfig::extra_vocabulary`.
static VOCABULARY_ENTRIES: &[(&str, SkillCategory)] = &[
    // Programming languages
    ("python", SkillCategory::Technical),
    ("java", SkillCategory::Technical),
    ("javascript", SkillCategory::Technical),
    ("typescript", SkillCategory::Technical),
    ("c++", SkillCategory::Technical),
    ("c#", SkillCategory::Technical),
    ("ruby", SkillCategory::Technical),
    ("php", SkillCategory::Technical),
    ("swift", SkillCategory::Technical),
    ("kotlin", SkillCategory::Technical),
    ("go", SkillCategory::Technical),
    ("rust", SkillCategory::Technical),
    ("scala", SkillCategory::Technical),
    ("r", SkillCategory::Technical),
    ("matlab", SkillCategory::Technical),
    ("bash", SkillCategory::Technical),
    ("powershell", SkillCategory::Technical),
    ("sql", SkillCategory::Technical),
    ("nosql", SkillCategory::Technical),
    ("html", SkillCategory::Technical),
    ("css", SkillCategory::Technical),
    // Web and backend
    ("react", SkillCategory::Technical),
    ("angular", SkillCategory::Technical),
    ("vue", SkillCategory::Technical),
    ("node.js", SkillCategory::Technical),
    ("django", SkillCategory::Technical),
    ("flask", SkillCategory::Technical),
    ("spring", SkillCategory::Technical),
    ("graphql", SkillCategory::Technical),
    ("rest api", SkillCategory::Technical),
    ("microservices", SkillCategory::Technical),
    ("tcp/ip", SkillCategory::Technical),
    // AI / ML / data
    ("machine learning", SkillCategory::Technical),
    ("ml", SkillCategory::Technical),
    ("deep learning", SkillCategory::Technical),
    ("artificial intelligence", SkillCategory::Technical),
    ("ai", SkillCategory::Technical),
    ("natural language processing", SkillCategory::Technical),
    ("nlp", SkillCategory::Technical),
    ("llm", SkillCategory::Technical),
    ("large language model", SkillCategory::Technical),
    ("retrieval augmented generation", SkillCategory::Technical),
    ("computer vision", SkillCategory::Technical),
    ("reinforcement learning", SkillCategory::Technical),
    ("supervised learning", SkillCategory::Technical),
    ("unsupervised learning", SkillCategory::Technical),
    ("time series analysis", SkillCategory::Technical),
    ("predictive modeling", SkillCategory::Technical),
    ("anomaly detection", SkillCategory::Technical),
    ("recommender systems", SkillCategory::Technical),
    ("tensorflow", SkillCategory::Technical),
    ("pytorch", SkillCategory::Technical),
    ("keras", SkillCategory::Technical),
    ("scikit-learn", SkillCategory::Technical),
    ("pandas", SkillCategory::Technical),
    ("numpy", SkillCategory::Technical),
    ("spark", SkillCategory::Technical),
    ("hadoop", SkillCategory::Technical),
    ("kafka", SkillCategory::Technical),
    ("airflow", SkillCategory::Technical),
    ("data science", SkillCategory::Technical),
    ("data engineering", SkillCategory::Technical),
    ("data analysis", SkillCategory::Technical),
    ("mlops", SkillCategory::Technical),
    // Cloud and DevOps
    ("aws", SkillCategory::Technical),
    ("amazon web services", SkillCategory::Technical),
    ("azure", SkillCategory::Technical),
    ("microsoft azure", SkillCategory::Technical),
    ("gcp", SkillCategory::Technical),
    ("google cloud platform", SkillCategory::Technical),
    ("google cloud", SkillCategory::Technical),
    ("cloud computing", SkillCategory::Technical),
    ("docker", SkillCategory::Technical),
    ("kubernetes", SkillCategory::Technical),
    ("terraform", SkillCategory::Technical),
    ("ansible", SkillCategory::Technical),
    ("jenkins", SkillCategory::Technical),
    ("github actions", SkillCategory::Technical),
    ("gitlab ci", SkillCategory::Technical),
    ("circleci", SkillCategory::Technical),
    ("travis ci", SkillCategory::Technical),
    ("helm", SkillCategory::Technical),
    ("istio", SkillCategory::Technical),
    ("serverless architecture", SkillCategory::Technical),
    ("lambda functions", SkillCategory::Technical),
    ("load balancing", SkillCategory::Technical),
    ("auto-scaling", SkillCategory::Technical),
    ("linux", SkillCategory::Technical),
    ("git", SkillCategory::Technical),
    ("ci/cd", SkillCategory::Technical),
    ("continuous integration", SkillCategory::Technical),
    ("continuous deployment", SkillCategory::Technical),
    ("devops", SkillCategory::Technical),
    // Databases
    ("mysql", SkillCategory::Technical),
    ("postgresql", SkillCategory::Technical),
    ("mariadb", SkillCategory::Technical),
    ("mongodb", SkillCategory::Technical),
    ("redis", SkillCategory::Technical),
    ("elasticsearch", SkillCategory::Technical),
    ("oracle", SkillCategory::Technical),
    ("sql server", SkillCategory::Technical),
    ("dynamodb", SkillCategory::Technical),
    ("cassandra", SkillCategory::Technical),
    ("neo4j", SkillCategory::Technical),
    ("sqlite", SkillCategory::Technical),
    // Security
    ("cybersecurity", SkillCategory::Technical),
    ("penetration testing", SkillCategory::Technical),
    ("encryption", SkillCategory::Technical),
    ("oauth", SkillCategory::Technical),
    ("authentication", SkillCategory::Technical),
    ("network security", SkillCategory::Technical),
    ("transport layer security", SkillCategory::Technical),
    ("secure sockets layer", SkillCategory::Technical),
    ("tls", SkillCategory::Technical),
    ("ssl", SkillCategory::Technical),
    // Testing
    ("jest", SkillCategory::Technical),
    ("junit", SkillCategory::Technical),
    ("pytest", SkillCategory::Technical),
    ("selenium", SkillCategory::Technical),
    ("cypress", SkillCategory::Technical),
    ("postman", SkillCategory::Technical),
    ("jmeter", SkillCategory::Technical),
    ("unit testing", SkillCategory::Technical),
    ("test automation", SkillCategory::Technical),
    // Methodologies and soft skills
    ("agile", SkillCategory::Technical),
    ("scrum", SkillCategory::Technical),
    ("kanban", SkillCategory::Technical),
    ("project management", SkillCategory::Technical),
    ("risk management", SkillCategory::Technical),
    ("stakeholder management", SkillCategory::Technical),
    ("leadership", SkillCategory::Technical),
    ("communication", SkillCategory::Technical),
    ("problem solving", SkillCategory::Technical),
    ("teamwork", SkillCategory::Technical),
    ("critical thinking", SkillCategory::Technical),
    ("time management", SkillCategory::Technical),
    ("mentorship", SkillCategory::Technical),
    ("strategic planning", SkillCategory::Technical),
    // Academic qualifications and disciplines
    ("bachelor of science", SkillCategory::Qualification),
    ("bachelor of arts", SkillCategory::Qualification),
    ("bachelor of technology", SkillCategory::Qualification),
    ("bachelor of engineering", SkillCategory::Qualification),
    ("master of science", SkillCategory::Qualification),
    ("master of technology", SkillCategory::Qualification),
    ("master of business administration", SkillCategory::Qualification),
    ("doctor of philosophy", SkillCategory::Qualification),
    ("associate degree", SkillCategory::Qualification),
    ("bsc", SkillCategory::Qualification),
    ("msc", SkillCategory::Qualification),
    ("mba", SkillCategory::Qualification),
    ("phd", SkillCategory::Qualification),
    ("b.tech", SkillCategory::Qualification),
    ("m.tech", SkillCategory::Qualification),
    ("postdoctoral research", SkillCategory::Qualification),
    ("research methodology", SkillCategory::Qualification),
    ("computer science", SkillCategory::Qualification),
    ("computer engineering", SkillCategory::Qualification),
    ("software engineering", SkillCategory::Qualification),
    ("information technology", SkillCategory::Qualification),
    ("electrical engineering", SkillCategory::Qualification),
    ("mechanical engineering", SkillCategory::Qualification),
    ("physics", SkillCategory::Qualification),
    ("mathematics", SkillCategory::Qualification),
    ("statistics", SkillCategory::Qualification),
    ("biology", SkillCategory::Qualification),
    ("chemistry", SkillCategory::Qualification),
    ("economics", SkillCategory::Qualification),
    ("business administration", SkillCategory::Qualification),
    ("finance", SkillCategory::Qualification),
    ("accounting", SkillCategory::Qualification),
    // Certifications
    ("aws certified", SkillCategory::Certification),
    ("aws certified solutions architect", SkillCategory::Certification),
    ("aws certified developer", SkillCategory::Certification),
    ("azure certification", SkillCategory::Certification),
    ("azure administrator", SkillCategory::Certification),
    ("google cloud certified", SkillCategory::Certification),
    ("cisco certified", SkillCategory::Certification),
    ("ccna", SkillCategory::Certification),
    ("pmp", SkillCategory::Certification),
    ("prince2", SkillCategory::Certification),
    ("scrum master", SkillCategory::Certification),
    ("certified scrum master", SkillCategory::Certification),
    ("six sigma", SkillCategory::Certification),
    ("comptia security+", SkillCategory::Certification),
    ("ceh", SkillCategory::Certification),
    ("cissp", SkillCategory::Certification),
    ("cfa", SkillCategory::Certification),
    ("chartered financial analyst", SkillCategory::Certification),
    ("cpa", SkillCategory::Certification),
    ("certified public accountant", SkillCategory::Certification),
    ("certified kubernetes administrator", SkillCategory::Certification),
];

/// Acronym/abbreviation expansions applied during canonicalization. Both the
/// short and the expanded form survive as separate candidate terms.
static ACRONYM_ENTRIES: &[(&str, &str)] = &[
    ("llm", "large language model"),
    ("nlp", "natural language processing"),
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("rag", "retrieval augmented generation"),
    // Academic abbreviations
    ("bsc", "bachelor of science"),
    ("msc", "master of science"),
    ("phd", "doctor of philosophy"),
    ("mba", "master of business administration"),
    ("b.tech", "bachelor of technology"),
    ("m.tech", "master of technology"),
    ("cfa", "chartered financial analyst"),
    ("cpa", "certified public accountant"),
    // Tech abbreviations
    ("ci/cd", "continuous integration/continuous deployment"),
    ("tls", "transport layer security"),
    ("ssl", "secure sockets layer"),
    ("aws", "amazon web services"),
    ("gcp", "google cloud platform"),
    ("k8s", "kubernetes"),
];

/// Study fields recognized inside qualification terms.
static KNOWN_FIELDS: &[&str] = &[
    "computer science",
    "computer engineering",
    "software engineering",
    "information technology",
    "electrical engineering",
    "mechanical engineering",
    "data science",
    "statistics",
    "mathematics",
    "physics",
    "chemistry",
    "biology",
    "economics",
    "finance",
    "accounting",
    "business administration",
    "psychology",
];

/// Default related-field groups: fields in the same group score half credit
/// against each other, exact equality scores full credit.
static RELATED_FIELD_GROUPS: &[&[&str]] = &[
    &[
        "computer science",
        "computer engineering",
        "software engineering",
        "information technology",
    ],
    &["data science", "statistics", "mathematics"],
    &["finance", "accounting", "economics", "business administration"],
];

/// Default equivalence classes: members are interchangeable at match time.
static EQUIVALENCE_GROUPS: &[(&str, &[&str])] = &[
    (
        "cloud platform",
        &[
            "aws",
            "amazon web services",
            "azure",
            "microsoft azure",
            "gcp",
            "google cloud platform",
            "google cloud",
            "cloud computing",
            "cloud platform",
        ],
    ),
    (
        "cloud certification",
        &[
            "aws certified",
            "aws certified solutions architect",
            "aws certified developer",
            "azure certification",
            "azure administrator",
            "google cloud certified",
        ],
    ),
    (
        "relational database",
        &["mysql", "postgresql", "mariadb", "oracle", "sql server", "sqlite"],
    ),
    (
        "ci/cd platform",
        &["jenkins", "github actions", "gitlab ci", "circleci", "travis ci"],
    ),
    ("ml framework", &["tensorflow", "pytorch", "keras"]),
];

static VOCABULARY: LazyLock<HashMap<&'static str, SkillCategory>> =
    LazyLock::new(|| VOCABULARY_ENTRIES.iter().copied().collect());

static ACRONYMS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ACRONYM_ENTRIES.iter().copied().collect());

/// Exact vocabulary lookup on an already-normalized term.
pub fn lookup(canonical: &str) -> Option<(&'static str, SkillCategory)> {
    VOCABULARY
        .get_key_value(canonical)
        .map(|(key, category)| (*key, *category))
}

/// Expansion for a known acronym, if any.
pub fn expand_acronym(term: &str) -> Option<&'static str> {
    ACRONYMS.get(term).copied()
}

pub fn entries() -> impl Iterator<Item = (&'static str, SkillCategory)> {
    VOCABULARY_ENTRIES.iter().copied()
}

pub fn acronym_entries() -> impl Iterator<Item = (&'static str, &'static str)> {
    ACRONYM_ENTRIES.iter().copied()
}

/// The first (longest) known study field named inside a qualification term.
pub fn field_of(canonical: &str) -> Option<&'static str> {
    KNOWN_FIELDS
        .iter()
        .copied()
        .filter(|field| contains_word(canonical, field))
        .max_by_key(|field| field.len())
}

pub fn default_related_field_groups() -> &'static [&'static [&'static str]] {
    RELATED_FIELD_GROUPS
}

pub fn default_equivalence_groups() -> &'static [(&'static str, &'static [&'static str])] {
    EQUIVALENCE_GROUPS
}

/// Whole-word containment: `needle` must not sit inside a larger word.
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut search_from = 0;
    while let Some(offset) = haystack[search_from..].find(needle) {
        let start = search_from + offset;
        let end = start + needle.len();
        let boundary_before = start == 0
            || !haystack[..start]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        let boundary_after = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
        if boundary_before && boundary_after {
            return true;
        }
        search_from = end;
    }
    false
}
