//! # Findable Retrieval
//!
//! C8–C10 of the audit pipeline: chunk a page's main content into
//! heading-tagged pieces, embed each chunk deterministically, and build a
//! per-site hybrid (vector + lexical) retriever the simulation runner
//! queries once per synthesized question.

pub mod chunker;
pub mod embedder;
pub mod index;

pub use chunker::{chunk_page, ChunkerConfig};
pub use embedder::{content_hash, cosine_similarity, Embedder, DEFAULT_DIMENSIONS, DEFAULT_MODEL_NAME};
pub use index::{IndexedChunk, RetrievalIndex, SearchResult, LEXICAL_WEIGHT, VECTOR_WEIGHT};
