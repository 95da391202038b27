//! Raw extractor output to canonical skill terms

use crate::config::CanonicalizationConfig;
use crate::error::{Result, SkillMatcherError};
use crate::oracle::extraction::RawExtraction;
use crate::profile::term::{SkillCategory, SkillTerm, TermSource};
use crate::processing::vocabulary;
use aho_corasick::AhoCorasick;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use strsim::levenshtein;
use unicode_segmentation::UnicodeSegmentation;

/// Normalizes arbitrary extractor output into canonical terms.
///
/// The pipeline is total: malformed, empty, or over-long inputs are dropped
/// (with a debug log), never turned into errors, because upstream extractors
/// produce arbitrary text.
pub struct TermCanonicalizer {
    vocabulary: HashMap<String, SkillCategory>,
    /// Vocabulary keys in deterministic order for the near-miss scan
    vocabulary_keys: Vec<String>,
    acronyms: HashMap<String, String>,
    /// Scans over-long phrases for embedded vocabulary entries
    salvage_scanner: AhoCorasick,
    /// Pattern id to vocabulary key, aligned with `salvage_scanner`
    salvage_patterns: Vec<String>,
    noise: Regex,
    whitespace: Regex,
    max_term_chars: usize,
    max_term_words: usize,
    default_confidence: f32,
    ner_confidence: f32,
}

impl TermCanonicalizer {
    pub fn new(config: &CanonicalizationConfig) -> Result<Self> {
        let mut vocabulary: HashMap<String, SkillCategory> = vocabulary::entries()
            .map(|(term, category)| (term.to_string(), category))
            .collect();
        for entry in &config.extra_vocabulary {
            vocabulary.insert(entry.term.to_lowercase(), entry.category);
        }
        let mut vocabulary_keys: Vec<String> = vocabulary.keys().cloned().collect();
        vocabulary_keys.sort();

        let mut acronyms: HashMap<String, String> = vocabulary::acronym_entries()
            .map(|(short, expansion)| (short.to_string(), expansion.to_string()))
            .collect();
        for rule in &config.extra_acronyms {
            acronyms.insert(rule.short.to_lowercase(), rule.expansion.to_lowercase());
        }

        let mut salvage_patterns: Vec<String> = vocabulary.keys().cloned().collect();
        // longest first so overlapping entries prefer the longer phrase
        salvage_patterns.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let salvage_scanner = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&salvage_patterns)
            .map_err(|e| {
                SkillMatcherError::Configuration(format!("failed to build vocabulary scanner: {}", e))
            })?;

        let noise = Regex::new(r"[^\w\s\-.,+#/&']+")
            .map_err(|e| SkillMatcherError::Configuration(format!("invalid noise pattern: {}", e)))?;
        let whitespace = Regex::new(r"\s+")
            .map_err(|e| SkillMatcherError::Configuration(format!("invalid whitespace pattern: {}", e)))?;

        Ok(TermCanonicalizer {
            vocabulary,
            vocabulary_keys,
            acronyms,
            salvage_scanner,
            salvage_patterns,
            noise,
            whitespace,
            max_term_chars: config.max_term_chars,
            max_term_words: config.max_term_words,
            default_confidence: config.default_confidence,
            ner_confidence: config.ner_confidence,
        })
    }

    /// Canonicalizes a list of raw extractor terms for one category.
    pub fn canonicalize(&self, raw_terms: &[String], category: SkillCategory) -> Vec<SkillTerm> {
        self.canonicalize_with_source(raw_terms, category, TermSource::Oracle)
    }

    /// Same as [`canonicalize`](Self::canonicalize) with an explicit
    /// provenance for non-vocabulary terms (NER pipelines pass
    /// `TermSource::Ner`).
    pub fn canonicalize_with_source(
        &self,
        raw_terms: &[String],
        category: SkillCategory,
        source: TermSource,
    ) -> Vec<SkillTerm> {
        let mut out = Vec::new();
        for raw in raw_terms {
            self.canonicalize_one(raw, category, source, &mut out);
        }
        out
    }

    /// Canonicalizes all three lists of an extraction payload.
    pub fn canonicalize_extraction(&self, extraction: &RawExtraction) -> Vec<SkillTerm> {
        let mut terms = self.canonicalize(&extraction.technical_skills, SkillCategory::Technical);
        terms.extend(self.canonicalize(&extraction.qualifications, SkillCategory::Qualification));
        terms.extend(self.canonicalize(&extraction.certifications, SkillCategory::Certification));
        terms
    }

    fn canonicalize_one(
        &self,
        raw: &str,
        category: SkillCategory,
        source: TermSource,
        out: &mut Vec<SkillTerm>,
    ) {
        let normalized = self.normalize(raw);
        if normalized.is_empty() {
            debug!("Dropping term with no usable content: {:?}", raw);
            return;
        }

        if self.over_length_bound(&normalized) {
            let salvaged = self.salvage(&normalized);
            if salvaged.is_empty() {
                debug!("Dropping over-long term: {:?}", raw);
            }
            for key in salvaged {
                let vocab_category = self.vocabulary[&key];
                out.push(SkillTerm::dictionary(raw, key, pick_category(category, vocab_category)));
            }
            return;
        }

        // whole-term vocabulary entries ("ci/cd", "tcp/ip") win over splitting
        let is_whole_entry = self.resolve_vocabulary(&normalized).is_some();
        if !is_whole_entry && normalized.contains(['/', '&']) {
            for part in normalized.split(['/', '&']) {
                let part = part.trim();
                if !part.is_empty() {
                    self.emit_forms(raw, part, category, source, out);
                }
            }
            return;
        }

        self.emit_forms(raw, &normalized, category, source, out);
    }

    /// Emits a term and, when it is a known acronym, its expansion as well.
    /// Multi-word terms additionally get a variant with embedded acronym
    /// tokens expanded ("b.tech in physics" emits "bachelor of technology
    /// in physics" too), so degree and field detection see the long forms.
    fn emit_forms(
        &self,
        raw: &str,
        term: &str,
        category: SkillCategory,
        source: TermSource,
        out: &mut Vec<SkillTerm>,
    ) {
        self.emit_single(raw, term, category, source, out);
        if let Some(expansion) = self.acronyms.get(term).cloned() {
            if expansion.contains(['/', '&']) {
                for part in expansion.split(['/', '&']) {
                    let part = part.trim();
                    if !part.is_empty() {
                        self.emit_single(raw, part, category, source, out);
                    }
                }
            } else {
                self.emit_single(raw, &expansion, category, source, out);
            }
        }

        if term.contains(' ') {
            let mut expanded_any = false;
            let tokens: Vec<&str> = term
                .split(' ')
                .map(|token| match self.acronyms.get(token) {
                    Some(expansion) if !expansion.contains(['/', '&']) => {
                        expanded_any = true;
                        expansion.as_str()
                    }
                    _ => token,
                })
                .collect();
            if expanded_any {
                self.emit_single(raw, &tokens.join(" "), category, source, out);
            }
        }
    }

    fn emit_single(
        &self,
        raw: &str,
        term: &str,
        category: SkillCategory,
        source: TermSource,
        out: &mut Vec<SkillTerm>,
    ) {
        match self.resolve_vocabulary(term) {
            Some((canonical, vocab_category)) => {
                out.push(SkillTerm::dictionary(raw, canonical, pick_category(category, vocab_category)));
            }
            None => {
                let confidence = match source {
                    TermSource::Ner => self.ner_confidence,
                    _ => self.default_confidence,
                };
                out.push(SkillTerm::new(raw, term, category, confidence, source));
            }
        }
    }

    /// Vocabulary resolution: exact form, then plural-stripped forms, then a
    /// near-miss snap within a small edit distance.
    fn resolve_vocabulary(&self, term: &str) -> Option<(String, SkillCategory)> {
        if let Some((key, category)) = self.vocabulary.get_key_value(term) {
            return Some((key.clone(), *category));
        }
        if let Some(stripped) = term.strip_suffix('s') {
            if let Some((key, category)) = self.vocabulary.get_key_value(stripped) {
                return Some((key.clone(), *category));
            }
        }
        if let Some(stripped) = term.strip_suffix("es") {
            if let Some((key, category)) = self.vocabulary.get_key_value(stripped) {
                return Some((key.clone(), *category));
            }
        }
        self.snap_near_miss(term)
    }

    /// Near-miss snap: accepts one edit for terms of five-plus characters,
    /// two edits from ten characters up. Iteration order over the key list is
    /// fixed, so ties resolve deterministically.
    fn snap_near_miss(&self, term: &str) -> Option<(String, SkillCategory)> {
        let term_len = term.chars().count();
        if term_len < 5 {
            return None;
        }
        let allowed = if term_len >= 10 { 2 } else { 1 };

        let mut best: Option<(usize, &String)> = None;
        for key in &self.vocabulary_keys {
            let key_len = key.chars().count();
            if key_len < 5 || key_len.abs_diff(term_len) > allowed {
                continue;
            }
            let distance = levenshtein(term, key);
            if distance <= allowed && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, key));
            }
        }

        best.map(|(_, key)| (key.clone(), self.vocabulary[key]))
    }

    fn normalize(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let cleaned = self.noise.replace_all(&lowered, "");
        let collapsed = self.whitespace.replace_all(&cleaned, " ");
        collapsed
            .trim()
            .trim_end_matches([',', '.', ';', ':'])
            .trim_start_matches([',', ';', ':'])
            .trim()
            .to_string()
    }

    fn over_length_bound(&self, term: &str) -> bool {
        term.chars().count() > self.max_term_chars
            || term.unicode_words().count() > self.max_term_words
    }

    /// Scans an over-long phrase for embedded vocabulary entries. The phrase
    /// itself is never emitted; only whole-word (plural-tolerant) hits are.
    fn salvage(&self, phrase: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for mat in self.salvage_scanner.find_iter(phrase) {
            if !word_bounded(phrase, mat.start(), mat.end()) {
                continue;
            }
            let key = &self.salvage_patterns[mat.pattern().as_usize()];
            if !found.contains(key) {
                found.push(key.clone());
            }
        }
        found
    }
}

/// Vocabulary category wins when it carries higher merge precedence than the
/// list the term arrived in (a certification named inside a skills list is
/// still a certification).
fn pick_category(listed: SkillCategory, vocab: SkillCategory) -> SkillCategory {
    if vocab.precedence() > listed.precedence() {
        vocab
    } else {
        listed
    }
}

/// Whole-word check for a scan hit, tolerating a plural `s`/`es` tail.
fn word_bounded(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = start == 0
        || !haystack[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
    if !before_ok {
        return false;
    }
    let tail = &haystack[end..];
    if tail.is_empty() {
        return true;
    }
    for plural in ["", "s", "es"] {
        if let Some(rest) = tail.strip_prefix(plural) {
            if !rest.chars().next().is_some_and(char::is_alphanumeric) {
                return true;
            }
        }
    }
    false
}
