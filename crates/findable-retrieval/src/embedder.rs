//! Deterministic embedder (C9): `text -> vector` with no network call and
//! no external model weights, so the whole pipeline stays reproducible
//! under `findable-determinism`'s `DeterministicContext`.
//!
//! Uses the feature-hashing trick (as in scikit-learn's `HashingVectorizer`
//! or Vowpal Wabbit): each token is hashed into one of `dimensions` buckets
//! with a hash-derived sign, contributions accumulate, and the result is
//! L2-normalized. This gives the two properties the retriever actually
//! depends on — `embed(x) == embed(x)` bitwise, and texts sharing many
//! tokens land closer in cosine space than texts sharing none — without
//! requiring a real model artifact this crate has no business vendoring.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const DEFAULT_MODEL_NAME: &str = "hashing-v1";
pub const DEFAULT_DIMENSIONS: usize = 384;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").unwrap());

fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// A deterministic embedding model, identified by `model_name` (part of the
/// cache/dedup key downstream — a different model name is a different
/// embedding space even with identical `dimensions`).
#[derive(Debug, Clone)]
pub struct Embedder {
    model_name: String,
    dimensions: usize,
}

impl Default for Embedder {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_NAME, DEFAULT_DIMENSIONS)
    }
}

impl Embedder {
    pub fn new(model_name: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model_name: model_name.into(),
            dimensions,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed `text` into a unit-norm (or all-zero, for empty input) vector
    /// of `self.dimensions` floats. Deterministic given `(model_name, text)`.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        // BTreeMap, not HashMap: iteration order below must be deterministic
        // across processes (token alphabetical order), since two tokens can
        // hash into the same bucket and float addition is not associative.
        let mut term_counts: BTreeMap<String, f64> = BTreeMap::new();
        for token in &tokens {
            *term_counts.entry(token.clone()).or_insert(0.0) += 1.0;
        }

        let mut vector = vec![0f64; self.dimensions];
        for (token, count) in &term_counts {
            let mut hasher = Sha256::new();
            hasher.update(self.model_name.as_bytes());
            hasher.update(b"\0");
            hasher.update(token.as_bytes());
            let digest = hasher.finalize();
            let idx = (u64::from_be_bytes(digest[0..8].try_into().unwrap()) as usize) % self.dimensions;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            // log-dampened term frequency, matching the hashing-vectorizer
            // sublinear-tf convention so one repeated word can't dominate a chunk.
            vector[idx] += sign * (1.0 + count.ln());
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            vector.iter().map(|v| (v / norm) as f32).collect()
        } else {
            vec![0.0; self.dimensions]
        }
    }
}

/// Cosine similarity between two equal-length vectors. Returns `0.0` for
/// mismatched lengths or a zero vector rather than panicking or NaN-ing,
/// since a zero embedding (empty chunk text) is a valid, if useless, input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// SHA-256 hex digest of `text`, used as the embedding dedup key
/// (`StoredEmbedding::content_hash`, unique with `site_id`).
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_is_deterministic() {
        let embedder = Embedder::default();
        let a = embedder.embed("Findable is an audit tool for AI visibility");
        let b = embedder.embed("Findable is an audit tool for AI visibility");
        assert_eq!(a, b);
    }

    #[test]
    fn shared_vocabulary_scores_higher_than_unrelated_text() {
        let embedder = Embedder::default();
        let base = embedder.embed("our platform audits website findability for AI search engines");
        let related = embedder.embed("this audit tool measures website findability for AI engines");
        let unrelated = embedder.embed("the population of Peru grew significantly last decade");

        let related_sim = cosine_similarity(&base, &related);
        let unrelated_sim = cosine_similarity(&base, &unrelated);
        assert!(related_sim > unrelated_sim, "related={related_sim} unrelated={unrelated_sim}");
    }

    #[test]
    fn empty_text_yields_zero_vector() {
        let embedder = Embedder::default();
        let v = embedder.embed("   ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(content_hash("hello"), content_hash("hello"));
        assert_ne!(content_hash("hello"), content_hash("world"));
    }
}
