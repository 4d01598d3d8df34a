//! HTTP and LLM cassettes (C15): VCR-style record/replay for the polite
//! fetcher and any future LLM-provider client, so a pipeline run can be
//! replayed byte-identical without hitting the network or an AI provider.
//!
//! Ported from `original_source/tests/fixtures/http_recorder.py`'s
//! `RecordMode`/`HTTPInteraction`/`HTTPCassette`. One behavior is
//! deliberately preserved rather than resolved: the Python original's
//! `HTTPRecorder._patch_httpx` raises `NotImplementedError("Recording
//! requires actual HTTP client...")` in its `NEW_EPISODES`/`ALL` branches
//! when no cassette match exists — i.e. the fixture as written can *replay*
//! but was never wired up to actually *record* a live response. Per
//! spec.md §9's open question ("whether production actually records or
//! only replays should be confirmed, not inferred"), `HTTPCassette::find`
//! here only ever replays; recording a new interaction is a distinct,
//! explicit `add` call a caller must make itself after a real fetch, not
//! something triggered implicitly by a cache miss.

use crate::context::request_hash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordMode {
    /// Replay only; fail if no match.
    None,
    /// Replay existing interactions; new ones are recorded by an explicit
    /// `add` call, never implicitly on a miss (see module docs).
    NewEpisodes,
    /// Every call is expected to be freshly recorded, overwriting matches.
    All,
    /// Replay only; a miss returns `Ok(None)` instead of erring.
    Optional,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HTTPInteraction {
    pub request_method: String,
    pub request_url: String,
    #[serde(default)]
    pub request_headers: HashMap<String, String>,
    pub request_body: Option<String>,
    pub response_status: u16,
    #[serde(default)]
    pub response_headers: HashMap<String, String>,
    pub response_body: String,
    pub recorded_at: String,
}

impl HTTPInteraction {
    pub fn request_hash(&self) -> String {
        request_hash(&self.request_method, &self.request_url, self.request_body.as_deref())
    }
}

#[derive(Debug, Error)]
pub enum CassetteError {
    #[error("no recorded interaction for {method} {url}")]
    NoMatch { method: String, url: String },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HTTPCassette {
    pub name: String,
    interactions: Vec<HTTPInteraction>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl HTTPCassette {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interactions: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, interaction) in self.interactions.iter().enumerate() {
            self.index.insert(interaction.request_hash(), i);
        }
    }

    pub fn add(&mut self, interaction: HTTPInteraction) {
        let hash = interaction.request_hash();
        self.interactions.push(interaction);
        self.index.insert(hash, self.interactions.len() - 1);
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Look up an interaction by exact request hash.
    pub fn find(&self, method: &str, url: &str, body: Option<&str>) -> Option<&HTTPInteraction> {
        let hash = request_hash(method, url, body);
        self.index.get(&hash).and_then(|&idx| self.interactions.get(idx))
    }

    /// Look up by URL regex, used when a cassette was recorded against a
    /// parameterized URL (pagination, query-string variance) that an exact
    /// hash match would never find.
    pub fn find_by_url_pattern(&self, method: &str, url_pattern: &str) -> Result<Option<&HTTPInteraction>, regex::Error> {
        let pattern = regex::Regex::new(url_pattern)?;
        Ok(self
            .interactions
            .iter()
            .find(|i| i.request_method.eq_ignore_ascii_case(method) && pattern.is_match(&i.request_url)))
    }

    /// Replay a request per `mode`. Recording a live response when no match
    /// exists is out of scope here (see module docs) — callers in
    /// `NewEpisodes`/`All` mode that get `Ok(None)` are expected to perform
    /// the real fetch themselves and `add` the result.
    pub fn replay(&self, mode: RecordMode, method: &str, url: &str, body: Option<&str>) -> Result<Option<&HTTPInteraction>, CassetteError> {
        let found = self.find(method, url, body);
        match mode {
            RecordMode::None => found.map(Some).ok_or_else(|| CassetteError::NoMatch {
                method: method.to_string(),
                url: url.to_string(),
            }),
            RecordMode::NewEpisodes | RecordMode::All => Ok(found),
            RecordMode::Optional => Ok(found),
        }
    }

    pub fn save(&self, path: &std::path::Path) -> Result<(), CassetteError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&SerializedCassette {
            name: self.name.clone(),
            interactions: self.interactions.clone(),
        })?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn load(path: &std::path::Path) -> Result<Self, CassetteError> {
        let raw = std::fs::read_to_string(path)?;
        let serialized: SerializedCassette = serde_json::from_str(&raw)?;
        let mut cassette = Self {
            name: serialized.name,
            interactions: serialized.interactions,
            index: HashMap::new(),
        };
        cassette.rebuild_index();
        Ok(cassette)
    }
}

#[derive(Serialize, Deserialize)]
struct SerializedCassette {
    name: String,
    interactions: Vec<HTTPInteraction>,
}

/// A single prompt/response pairing for LLM-call replay, keyed the same way
/// as `HTTPCassette` but hashed with `crate::context::prompt_hash` instead
/// of `request_hash`. Distinct from `HTTPCassette` because prompt matching
/// optionally tolerates near-duplicate prompts (`fuzzy_find`), which a raw
/// request hash never would.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMInteraction {
    pub prompt: String,
    pub model: Option<String>,
    pub response: String,
    pub recorded_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLMCassette {
    pub name: String,
    interactions: Vec<LLMInteraction>,
}

impl LLMCassette {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interactions: Vec::new(),
        }
    }

    pub fn add(&mut self, interaction: LLMInteraction) {
        self.interactions.push(interaction);
    }

    pub fn find(&self, prompt: &str, model: Option<&str>) -> Option<&LLMInteraction> {
        let hash = crate::context::prompt_hash(prompt, model);
        self.interactions
            .iter()
            .find(|i| crate::context::prompt_hash(&i.prompt, i.model.as_deref()) == hash)
    }

    /// Fall back to a Jaccard-similarity match over whitespace tokens when
    /// no exact hash match exists, for replaying against prompts that
    /// differ only in incidental wording (e.g. a template filled with a
    /// slightly different site name). `threshold` is the minimum similarity
    /// to accept, in `[0, 1]`.
    pub fn fuzzy_find(&self, prompt: &str, threshold: f64) -> Option<&LLMInteraction> {
        let tokens: std::collections::HashSet<&str> = prompt.split_whitespace().collect();
        self.interactions
            .iter()
            .map(|i| {
                let other: std::collections::HashSet<&str> = i.prompt.split_whitespace().collect();
                let intersection = tokens.intersection(&other).count();
                let union = tokens.union(&other).count().max(1);
                (intersection as f64 / union as f64, i)
            })
            .filter(|(score, _)| *score >= threshold)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, i)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(url: &str, body: &str) -> HTTPInteraction {
        HTTPInteraction {
            request_method: "GET".to_string(),
            request_url: url.to_string(),
            request_headers: HashMap::new(),
            request_body: None,
            response_status: 200,
            response_headers: HashMap::new(),
            response_body: body.to_string(),
            recorded_at: "2026-01-29T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn exact_match_replays_recorded_response() {
        let mut cassette = HTTPCassette::new("default");
        cassette.add(interaction("https://example.com/", "hello"));
        let found = cassette.find("GET", "https://example.com/", None).unwrap();
        assert_eq!(found.response_body, "hello");
    }

    #[test]
    fn none_mode_errors_on_miss() {
        let cassette = HTTPCassette::new("default");
        let result = cassette.replay(RecordMode::None, "GET", "https://example.com/", None);
        assert!(result.is_err());
    }

    #[test]
    fn optional_mode_returns_none_on_miss_without_erroring() {
        let cassette = HTTPCassette::new("default");
        let result = cassette.replay(RecordMode::Optional, "GET", "https://example.com/", None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn new_episodes_mode_never_fabricates_a_response_on_miss() {
        let cassette = HTTPCassette::new("default");
        let result = cassette.replay(RecordMode::NewEpisodes, "GET", "https://example.com/", None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn fuzzy_find_matches_near_duplicate_prompts() {
        let mut cassette = LLMCassette::new("default");
        cassette.add(LLMInteraction {
            prompt: "What is Findable?".to_string(),
            model: None,
            response: "An AI findability auditor".to_string(),
            recorded_at: "2026-01-29T12:00:00Z".to_string(),
        });
        let found = cassette.fuzzy_find("What is Findable", 0.5).unwrap();
        assert_eq!(found.response, "An AI findability auditor");
    }
}
