//! Embedding service boundary with a shared in-memory vector cache

use crate::error::{Result, SkillMatcherError};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// External collaborator that embeds canonical terms into vectors.
///
/// `embed` must return one vector per input term, positionally aligned with
/// the request. Implementations own transport and batching limits.
pub trait EmbeddingService: Send + Sync {
    fn embed(&self, terms: &[String], timeout: Duration) -> Result<Vec<Vec<f32>>>;

    /// Vector width this service produces. Used to validate responses.
    fn dimensions(&self) -> usize;
}

/// Counters for cache introspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
}

/// Thread-safe canonical-term to vector cache.
///
/// A canonical term always embeds to the same vector within a process, so
/// entries are write-once: the first stored vector for a term wins and
/// later inserts for the same term are ignored.
#[derive(Debug, Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<String, Arc<Vec<f32>>>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<Arc<Vec<f32>>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(term).cloned()
    }

    /// Stores a vector for `term` unless one is already present, returning
    /// the vector that ends up in the cache.
    pub fn insert_if_absent(&self, term: &str, vector: Vec<f32>) -> Arc<Vec<f32>> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(term.to_string())
            .or_insert_with(|| Arc::new(vector))
            .clone()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { entries: self.len() }
    }
}

/// Embedding service wrapper that batches requests and reuses cached
/// vectors across comparisons.
pub struct CachedEmbedder {
    service: Box<dyn EmbeddingService>,
    cache: Arc<EmbeddingCache>,
    timeout: Duration,
    max_retries: u32,
}

impl CachedEmbedder {
    pub fn new(service: Box<dyn EmbeddingService>, timeout: Duration, max_retries: u32) -> Self {
        Self {
            service,
            cache: Arc::new(EmbeddingCache::new()),
            timeout,
            max_retries,
        }
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn dimensions(&self) -> usize {
        self.service.dimensions()
    }

    /// Resolves vectors for every requested term, fetching only the terms
    /// the cache does not already hold in a single batched service call.
    ///
    /// The cache lock is never held across the service call. Either all
    /// requested terms resolve or the whole batch fails.
    pub fn embed_all(&self, terms: &[String]) -> Result<HashMap<String, Arc<Vec<f32>>>> {
        let mut resolved: HashMap<String, Arc<Vec<f32>>> = HashMap::with_capacity(terms.len());
        let mut uncached: Vec<String> = Vec::new();

        for term in terms {
            if resolved.contains_key(term) {
                continue;
            }
            match self.cache.get(term) {
                Some(vector) => {
                    resolved.insert(term.clone(), vector);
                }
                None => {
                    if !uncached.contains(term) {
                        uncached.push(term.clone());
                    }
                }
            }
        }

        if uncached.is_empty() {
            return Ok(resolved);
        }

        debug!(
            "Embedding batch: {} cached, {} to fetch",
            resolved.len(),
            uncached.len()
        );

        let vectors = self.call_with_retry(&uncached)?;
        if vectors.len() != uncached.len() {
            return Err(SkillMatcherError::EmbeddingService(format!(
                "service returned {} vectors for {} terms",
                vectors.len(),
                uncached.len()
            )));
        }

        let expected = self.service.dimensions();
        for (term, vector) in uncached.into_iter().zip(vectors) {
            if vector.len() != expected {
                return Err(SkillMatcherError::EmbeddingDimension {
                    expected,
                    actual: vector.len(),
                });
            }
            let stored = self.cache.insert_if_absent(&term, vector);
            resolved.insert(term, stored);
        }

        Ok(resolved)
    }

    fn call_with_retry(&self, terms: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut attempt = 0;
        loop {
            match self.service.embed(terms, self.timeout) {
                Ok(vectors) => return Ok(vectors),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Embedding request failed (attempt {}/{}): {}",
                        attempt, self.max_retries, e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Cosine similarity between two vectors of the same dimension.
/// A zero-magnitude vector has no direction, so its similarity to
/// anything is 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SkillMatcherError::EmbeddingDimension {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps each term to a fixed unit vector so tests control similarity.
    struct StubService {
        calls: AtomicUsize,
        terms_seen: RwLock<Vec<Vec<String>>>,
        fail_first: usize,
    }

    impl StubService {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                terms_seen: RwLock::new(Vec::new()),
                fail_first: 0,
            }
        }

        fn vector_for(term: &str) -> Vec<f32> {
            // Deterministic toy embedding keyed on the first byte.
            let x = term.bytes().next().unwrap_or(0) as f32;
            vec![x, 1.0, 0.0]
        }
    }

    impl EmbeddingService for StubService {
        fn embed(&self, terms: &[String], _timeout: Duration) -> Result<Vec<Vec<f32>>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(SkillMatcherError::EmbeddingService("timeout".to_string()));
            }
            self.terms_seen.write().unwrap().push(terms.to_vec());
            Ok(terms.iter().map(|t| Self::vector_for(t)).collect())
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_embed_all_batches_one_call() {
        let embedder = CachedEmbedder::new(Box::new(StubService::new()), Duration::from_secs(1), 0);
        let resolved = embedder
            .embed_all(&terms(&["python", "aws", "docker"]))
            .unwrap();
        assert_eq!(resolved.len(), 3);
        assert_eq!(embedder.cache().len(), 3);
    }

    #[test]
    fn test_cache_hit_skips_service() {
        let service = StubService::new();
        let embedder = CachedEmbedder::new(Box::new(service), Duration::from_secs(1), 0);

        embedder.embed_all(&terms(&["python", "aws"])).unwrap();
        embedder.embed_all(&terms(&["python", "aws"])).unwrap();

        // Second pass resolves entirely from cache.
        assert_eq!(embedder.cache().len(), 2);
        let resolved = embedder.embed_all(&terms(&["python"])).unwrap();
        assert_eq!(resolved["python"].len(), 3);
    }

    #[test]
    fn test_only_uncached_terms_are_fetched() {
        let embedder = CachedEmbedder::new(Box::new(StubService::new()), Duration::from_secs(1), 0);
        embedder.embed_all(&terms(&["python"])).unwrap();
        let resolved = embedder.embed_all(&terms(&["python", "aws"])).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(embedder.cache().len(), 2);
    }

    #[test]
    fn test_duplicate_request_terms_fetch_once() {
        let embedder = CachedEmbedder::new(Box::new(StubService::new()), Duration::from_secs(1), 0);
        let resolved = embedder
            .embed_all(&terms(&["python", "python", "python"]))
            .unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(embedder.cache().len(), 1);
    }

    #[test]
    fn test_retry_recovers_then_caches() {
        let service = StubService { fail_first: 1, ..StubService::new() };
        let embedder = CachedEmbedder::new(Box::new(service), Duration::from_secs(1), 2);
        let resolved = embedder.embed_all(&terms(&["python"])).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_batch_failure_surfaces_error() {
        let service = StubService { fail_first: 10, ..StubService::new() };
        let embedder = CachedEmbedder::new(Box::new(service), Duration::from_secs(1), 1);
        let result = embedder.embed_all(&terms(&["python"]));
        assert!(matches!(result, Err(SkillMatcherError::EmbeddingService(_))));
        assert!(embedder.cache().is_empty());
    }

    #[test]
    fn test_short_response_is_rejected() {
        struct ShortService;
        impl EmbeddingService for ShortService {
            fn embed(&self, _terms: &[String], _timeout: Duration) -> Result<Vec<Vec<f32>>> {
                Ok(vec![vec![1.0, 0.0, 0.0]])
            }
            fn dimensions(&self) -> usize {
                3
            }
        }
        let embedder = CachedEmbedder::new(Box::new(ShortService), Duration::from_secs(1), 0);
        let result = embedder.embed_all(&terms(&["python", "aws"]));
        assert!(matches!(result, Err(SkillMatcherError::EmbeddingService(_))));
    }

    #[test]
    fn test_wrong_width_vector_is_rejected() {
        struct NarrowService;
        impl EmbeddingService for NarrowService {
            fn embed(&self, terms: &[String], _timeout: Duration) -> Result<Vec<Vec<f32>>> {
                Ok(terms.iter().map(|_| vec![1.0]).collect())
            }
            fn dimensions(&self) -> usize {
                3
            }
        }
        let embedder = CachedEmbedder::new(Box::new(NarrowService), Duration::from_secs(1), 0);
        let result = embedder.embed_all(&terms(&["python"]));
        assert!(matches!(
            result,
            Err(SkillMatcherError::EmbeddingDimension { expected: 3, actual: 1 })
        ));
    }

    #[test]
    fn test_insert_if_absent_first_write_wins() {
        let cache = EmbeddingCache::new();
        let first = cache.insert_if_absent("python", vec![1.0, 0.0]);
        let second = cache.insert_if_absent("python", vec![0.0, 1.0]);
        assert_eq!(*first, vec![1.0, 0.0]);
        assert_eq!(*second, vec![1.0, 0.0]);
        assert_eq!(cache.stats(), CacheStats { entries: 1 });
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let score = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        let score = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let result = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(SkillMatcherError::EmbeddingDimension { expected: 2, actual: 3 })
        ));
    }
}
