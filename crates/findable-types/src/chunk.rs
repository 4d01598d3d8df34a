//! Chunk data model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Text,
    List,
    Table,
    Heading,
    Code,
}

/// A semantically coherent slice of a page's extracted text.
///
/// Invariant (enforced by `findable-retrieval::chunker`): chunks of a page
/// are emitted in document order and `position_ratio` strictly increases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: String,
    pub page_id: String,
    pub content: String,
    pub heading_context: Option<String>,
    pub chunk_type: ChunkType,
    pub chunk_index: usize,
    pub position_ratio: f64,
}
