//! # Findable Determinism
//!
//! C15 of the audit pipeline: a seeded execution context, an HTTP/LLM
//! cassette record-replay harness, and snapshot-testing utilities, so that
//! a pipeline run driven by the same seed, frozen clock and cassettes
//! reproduces byte-identical output.

pub mod cassette;
pub mod context;
pub mod snapshot;

pub use cassette::{CassetteError, HTTPCassette, HTTPInteraction, LLMCassette, LLMInteraction, RecordMode};
pub use context::{content_hash, prompt_hash, request_hash, DeterministicContext, SeededRandom};
pub use snapshot::{assert_match, normalize_floats, normalize_ids, normalize_timestamps, normalize_uuids, normalize_whitespace, Snapshot, SnapshotDiff, SnapshotError, SnapshotStore};
