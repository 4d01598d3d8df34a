//! Stored embedding data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted embedding of a chunk. Unique on `(content_hash, site_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEmbedding {
    pub id: String,
    pub chunk_id: String,
    pub page_id: String,
    pub site_id: String,
    pub content: String,
    pub content_hash: String,
    pub embedding: Vec<f32>,
    pub model_name: String,
    pub dimensions: usize,
    pub created_at: DateTime<Utc>,
}

impl StoredEmbedding {
    pub fn dedup_key(&self) -> (String, String) {
        (self.content_hash.clone(), self.site_id.clone())
    }
}
