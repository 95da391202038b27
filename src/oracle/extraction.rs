//! Extraction oracle boundary: trait, payload schema, strict validation

use crate::config::CollaboratorConfig;
use crate::error::{Result, SkillMatcherError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on the number of terms per list; anything larger is treated
/// as a malformed payload rather than a legitimate profile.
const MAX_TERMS_PER_LIST: usize = 1000;

/// Structured output of an external extraction collaborator.
///
/// The schema is strict: exactly these three lists, nothing else. Extra or
/// missing fields are a parse failure, never silently tolerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawExtraction {
    pub technical_skills: Vec<String>,
    pub qualifications: Vec<String>,
    pub certifications: Vec<String>,
}

impl RawExtraction {
    /// Parses and validates an oracle JSON payload. Every failure maps to
    /// the extraction-parse error so callers can apply the zero-result
    /// fallback uniformly.
    pub fn from_json(payload: &str) -> Result<RawExtraction> {
        let extraction: RawExtraction = serde_json::from_str(payload)
            .map_err(|e| SkillMatcherError::ExtractionParse(e.to_string()))?;
        extraction.validate()?;
        Ok(extraction)
    }

    /// Sanity checks beyond the serde schema.
    pub fn validate(&self) -> Result<()> {
        for (name, list) in [
            ("technical_skills", &self.technical_skills),
            ("qualifications", &self.qualifications),
            ("certifications", &self.certifications),
        ] {
            if list.len() > MAX_TERMS_PER_LIST {
                return Err(SkillMatcherError::ExtractionParse(format!(
                    "{} lists {} terms, limit is {}",
                    name,
                    list.len(),
                    MAX_TERMS_PER_LIST
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.technical_skills.is_empty()
            && self.qualifications.is_empty()
            && self.certifications.is_empty()
    }
}

/// External collaborator that turns document text into term lists.
///
/// Implementations own transport, prompting, and parsing; they must either
/// return a schema-valid payload or fail explicitly. The engine never
/// reaches for a process-wide client, only for the injected instance.
pub trait ExtractionOracle: Send + Sync {
    fn extract(&self, text: &str, timeout: Duration) -> Result<RawExtraction>;
}

/// Invokes the oracle with the configured timeout and bounded retry.
/// Connectivity failures are retried; schema violations are not, because a
/// retry cannot repair a contract breach.
pub fn extract_with_policy(
    oracle: &dyn ExtractionOracle,
    text: &str,
    config: &CollaboratorConfig,
) -> Result<RawExtraction> {
    let timeout = config.request_timeout();
    let mut attempt = 0;
    loop {
        match oracle.extract(text, timeout) {
            Ok(extraction) => {
                extraction.validate()?;
                return Ok(extraction);
            }
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                warn!(
                    "Extraction request failed (attempt {}/{}): {}",
                    attempt, config.max_retries, e
                );
            }
            Err(e) => return Err(e),
        }
    }
}
