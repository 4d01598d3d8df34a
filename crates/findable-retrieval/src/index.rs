//! Per-site hybrid retriever (C10): a vector k-NN pass blended with a
//! lexical (BM25-flavored) token-overlap pass, combined with a fixed
//! convex weight. Grounded in `worker/embeddings/storage.py`'s
//! `EmbeddingStore`/`SearchResult` shape, generalized from a pgvector
//! `<=>` ANN query to an in-process index since this crate has no database
//! of its own to query (the audit core consumes `PersistenceStore` for
//! cross-run reuse, not for the retrieval hot path within one run).

use crate::embedder::{cosine_similarity, Embedder};
use findable_types::embedding::StoredEmbedding;
use std::collections::{HashMap, HashSet};

/// One convex blend: `combined = VECTOR_WEIGHT * vector_score + LEXICAL_WEIGHT * lexical_score`.
pub const VECTOR_WEIGHT: f64 = 0.65;
pub const LEXICAL_WEIGHT: f64 = 0.35;

/// A heading-context boost applied to the lexical score when any query
/// token also appears in the chunk's heading chain.
const HEADING_BOOST: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub embedding_id: String,
    pub chunk_id: String,
    pub page_id: String,
    pub site_id: String,
    pub content: String,
    pub content_hash: String,
    pub embedding: Vec<f32>,
    pub heading_context: Option<String>,
    pub position_ratio: f64,
    pub source_url: String,
    pub page_title: Option<String>,
}

impl IndexedChunk {
    pub fn dedup_key(&self) -> (String, String) {
        (self.content_hash.clone(), self.site_id.clone())
    }

    pub fn into_stored_embedding(self, model_name: &str) -> StoredEmbedding {
        StoredEmbedding {
            id: self.embedding_id,
            chunk_id: self.chunk_id,
            page_id: self.page_id,
            site_id: self.site_id,
            content: self.content,
            content_hash: self.content_hash,
            dimensions: self.embedding.len(),
            embedding: self.embedding,
            model_name: model_name.to_string(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// A single hybrid-retrieval hit.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
    pub doc_id: String,
    pub content: String,
    /// Blended relevance in `[0,1]`, higher is more relevant.
    pub score: f64,
    /// Vector distance (`1 - cosine similarity`), lower is closer.
    pub distance: f64,
    pub heading_context: Option<String>,
    pub source_url: String,
    pub page_title: Option<String>,
}

/// A per-site index. Writes (`upsert`) are expected to be serialized by the
/// caller (the index-build phase owns one site exclusively); reads
/// (`hybrid_retrieve`) are safe to call concurrently once built, since they
/// only borrow `&self`.
pub struct RetrievalIndex {
    site_id: String,
    embedder: Embedder,
    entries: Vec<IndexedChunk>,
    dedup: HashMap<(String, String), usize>,
}

impl RetrievalIndex {
    pub fn new(site_id: impl Into<String>, embedder: Embedder) -> Self {
        Self {
            site_id: site_id.into(),
            embedder,
            entries: Vec::new(),
            dedup: HashMap::new(),
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a chunk, keyed on `(content_hash, site_id)`.
    pub fn upsert(&mut self, entry: IndexedChunk) {
        let key = entry.dedup_key();
        if let Some(&idx) = self.dedup.get(&key) {
            self.entries[idx] = entry;
        } else {
            self.dedup.insert(key, self.entries.len());
            self.entries.push(entry);
        }
    }

    pub fn upsert_many(&mut self, entries: impl IntoIterator<Item = IndexedChunk>) {
        for entry in entries {
            self.upsert(entry);
        }
    }

    /// Vector k-NN merged with lexical token overlap, fixed convex blend,
    /// returning the top `k` by descending score (ties broken by ascending
    /// `position_ratio`, then ascending `chunk_id`).
    pub fn hybrid_retrieve(&self, query: &str, k: usize) -> Vec<SearchResult> {
        if self.entries.is_empty() || k == 0 {
            return Vec::new();
        }

        let query_vector = self.embedder.embed(query);
        let query_tokens = tokenize(query);

        let mut scored: Vec<(f64, f64, &IndexedChunk)> = self
            .entries
            .iter()
            .map(|entry| {
                let cos = cosine_similarity(&query_vector, &entry.embedding);
                let vector_score = ((cos + 1.0) / 2.0).clamp(0.0, 1.0);
                let lexical_score = lexical_overlap(&query_tokens, entry);
                let combined = (VECTOR_WEIGHT * vector_score + LEXICAL_WEIGHT * lexical_score).clamp(0.0, 1.0);
                (combined, 1.0 - cos, entry)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.2.position_ratio.partial_cmp(&b.2.position_ratio).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| a.2.chunk_id.cmp(&b.2.chunk_id))
        });

        scored
            .into_iter()
            .take(k)
            .map(|(score, distance, entry)| SearchResult {
                doc_id: entry.chunk_id.clone(),
                content: entry.content.clone(),
                score,
                distance,
                heading_context: entry.heading_context.clone(),
                source_url: entry.source_url.clone(),
                page_title: entry.page_title.clone(),
            })
            .collect()
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Fraction of query tokens present in the chunk content, boosted if any
/// query token also appears in the heading context (the BM25-style
/// "heading-context boost" the spec calls for, without a full BM25 term
/// corpus — this crate has only one query at a time, not a corpus of them).
fn lexical_overlap(query_tokens: &HashSet<String>, entry: &IndexedChunk) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }
    let content_tokens = tokenize(&entry.content);
    let matched = query_tokens.intersection(&content_tokens).count();
    let base = matched as f64 / query_tokens.len() as f64;

    let heading_match = entry
        .heading_context
        .as_ref()
        .map(|h| {
            let heading_tokens = tokenize(h);
            query_tokens.intersection(&heading_tokens).next().is_some()
        })
        .unwrap_or(false);

    if heading_match {
        (base + HEADING_BOOST).min(1.0)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, content: &str, heading: Option<&str>, embedder: &Embedder, position_ratio: f64) -> IndexedChunk {
        IndexedChunk {
            embedding_id: format!("emb-{id}"),
            chunk_id: id.to_string(),
            page_id: "page-1".to_string(),
            site_id: "site-1".to_string(),
            content: content.to_string(),
            content_hash: crate::embedder::content_hash(content),
            embedding: embedder.embed(content),
            heading_context: heading.map(|s| s.to_string()),
            position_ratio,
            source_url: "https://example.com/".to_string(),
            page_title: Some("Example".to_string()),
        }
    }

    #[test]
    fn retrieves_most_relevant_chunk_first() {
        let embedder = Embedder::default();
        let mut index = RetrievalIndex::new("site-1", embedder.clone());
        index.upsert(chunk(
            "a",
            "Findable is an audit tool that measures AI visibility for websites",
            Some("About"),
            &embedder,
            0.1,
        ));
        index.upsert(chunk("b", "The population of Peru grew over the last decade", Some("Trivia"), &embedder, 0.9));

        let results = index.hybrid_retrieve("What is Findable?", 2);
        assert_eq!(results[0].doc_id, "a");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn upsert_dedups_by_content_hash_and_site() {
        let embedder = Embedder::default();
        let mut index = RetrievalIndex::new("site-1", embedder.clone());
        index.upsert(chunk("a", "duplicate content here", None, &embedder, 0.1));
        index.upsert(chunk("a-again", "duplicate content here", None, &embedder, 0.2));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn empty_index_returns_no_results() {
        let index = RetrievalIndex::new("site-1", Embedder::default());
        assert!(index.hybrid_retrieve("anything", 5).is_empty());
    }
}
