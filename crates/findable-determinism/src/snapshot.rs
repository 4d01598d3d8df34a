//! Snapshot testing utilities (C15): compare a test's actual output
//! against a stored snapshot on disk, with a battery of normalizers to
//! strip incidental noise (timestamps, UUIDs, ids, float precision,
//! whitespace) before comparing.
//!
//! Ported from `original_source/tests/fixtures/snapshots.py`'s
//! `Snapshot`/`SnapshotStore`/`SnapshotAssertion` and its normalizer
//! functions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A comparison between a stored snapshot and a freshly produced value.
#[derive(Debug, Clone)]
pub struct SnapshotDiff {
    pub expected: String,
    pub actual: String,
}

impl SnapshotDiff {
    pub fn is_match(&self) -> bool {
        self.expected == self.actual
    }

    /// A line-by-line diff in the spirit of `difflib.unified_diff`: every
    /// line only in `expected` prefixed `-`, every line only in `actual`
    /// prefixed `+`, matching context lines left unprefixed. Not a minimal
    /// LCS diff — good enough for a human reading a test failure, not for
    /// patch application.
    pub fn unified_diff(&self) -> String {
        if self.is_match() {
            return String::new();
        }
        let expected_lines: Vec<&str> = self.expected.lines().collect();
        let actual_lines: Vec<&str> = self.actual.lines().collect();
        let mut out = String::from("--- expected\n+++ actual\n");
        let max_len = expected_lines.len().max(actual_lines.len());
        for i in 0..max_len {
            let e = expected_lines.get(i).copied();
            let a = actual_lines.get(i).copied();
            match (e, a) {
                (Some(e), Some(a)) if e == a => out.push_str(&format!(" {e}\n")),
                (Some(e), Some(a)) => {
                    out.push_str(&format!("-{e}\n"));
                    out.push_str(&format!("+{a}\n"));
                }
                (Some(e), None) => out.push_str(&format!("-{e}\n")),
                (None, Some(a)) => out.push_str(&format!("+{a}\n")),
                (None, None) => {}
            }
        }
        out
    }
}

impl std::fmt::Display for SnapshotDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_match() {
            write!(f, "Snapshot matches")
        } else {
            write!(f, "Snapshot mismatch:\n{}", self.unified_diff())
        }
    }
}

/// Manages snapshot storage and retrieval, lazily loading every
/// `*.snap.json` file in `snapshot_dir` on first access.
pub struct SnapshotStore {
    snapshot_dir: PathBuf,
    snapshots: HashMap<String, Snapshot>,
    loaded: bool,
}

impl SnapshotStore {
    pub fn new(snapshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.into(),
            snapshots: HashMap::new(),
            loaded: false,
        }
    }

    fn ensure_loaded(&mut self) -> Result<(), SnapshotError> {
        if self.loaded {
            return Ok(());
        }
        if self.snapshot_dir.is_dir() {
            for entry in std::fs::read_dir(&self.snapshot_dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Ok(snapshot) = Self::load_file(&path) {
                    self.snapshots.insert(snapshot.name.clone(), snapshot);
                }
            }
        }
        self.loaded = true;
        Ok(())
    }

    fn load_file(path: &Path) -> Result<Snapshot, SnapshotError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.snapshot_dir.join(format!("{name}.snap.json"))
    }

    pub fn get(&mut self, name: &str) -> Result<Option<Snapshot>, SnapshotError> {
        self.ensure_loaded()?;
        Ok(self.snapshots.get(name).cloned())
    }

    pub fn save(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(&self.snapshot_dir)?;
        let path = self.file_path(&snapshot.name);
        std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        self.snapshots.insert(snapshot.name.clone(), snapshot);
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<bool, SnapshotError> {
        self.ensure_loaded()?;
        if self.snapshots.remove(name).is_none() {
            return Ok(false);
        }
        let path = self.file_path(name);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(true)
    }

    pub fn list_all(&mut self) -> Result<Vec<String>, SnapshotError> {
        self.ensure_loaded()?;
        let mut names: Vec<String> = self.snapshots.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?").unwrap())
}

fn uuid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap())
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)("[\w_]*id"\s*:\s*)\d+"#).unwrap())
}

fn float_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+\.\d+").unwrap())
}

pub fn normalize_timestamps(content: &str) -> String {
    timestamp_re().replace_all(content, "<TIMESTAMP>").into_owned()
}

pub fn normalize_uuids(content: &str) -> String {
    uuid_re().replace_all(content, "<UUID>").into_owned()
}

pub fn normalize_ids(content: &str) -> String {
    id_re().replace_all(content, "${1}<ID>").into_owned()
}

pub fn normalize_floats(content: &str, precision: usize) -> String {
    float_re()
        .replace_all(content, |caps: &regex::Captures| {
            let value: f64 = caps[0].parse().unwrap_or(0.0);
            format!("{value:.precision$}")
        })
        .into_owned()
}

pub fn normalize_whitespace(content: &str) -> String {
    static MULTI_SPACE: OnceLock<Regex> = OnceLock::new();
    static TRAILING_SPACE: OnceLock<Regex> = OnceLock::new();
    let multi_space = MULTI_SPACE.get_or_init(|| Regex::new(r"[ \t]+").unwrap());
    let trailing_space = TRAILING_SPACE.get_or_init(|| Regex::new(r" +\n").unwrap());

    let content = multi_space.replace_all(content, " ");
    let content = trailing_space.replace_all(&content, "\n");
    content.replace("\r\n", "\n").trim().to_string()
}

pub type Normalizer = fn(&str) -> String;

/// Run `actual` through `normalizers` in order before diffing against
/// `expected` (itself already normalized the same way when it was saved).
pub fn assert_match(expected: &str, actual: &str, normalizers: &[Normalizer]) -> SnapshotDiff {
    let mut actual = actual.to_string();
    for normalizer in normalizers {
        actual = normalizer(&actual);
    }
    SnapshotDiff {
        expected: expected.to_string(),
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_normalized() {
        let content = r#"{"created_at": "2026-01-29T12:00:00Z"}"#;
        assert_eq!(normalize_timestamps(content), r#"{"created_at": "<TIMESTAMP>"}"#);
    }

    #[test]
    fn uuids_are_normalized() {
        let content = "id: 550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(normalize_uuids(content), "id: <UUID>");
    }

    #[test]
    fn numeric_ids_are_normalized_but_not_other_numbers() {
        let content = r#"{"user_id": 12345, "score": 87}"#;
        assert_eq!(normalize_ids(content), r#"{"user_id": <ID>, "score": 87}"#);
    }

    #[test]
    fn floats_are_rounded_to_given_precision() {
        let content = "score: 87.65432";
        assert_eq!(normalize_floats(content, 2), "score: 87.65");
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        let content = "a   b\t\tc  \n\n  ";
        assert_eq!(normalize_whitespace(content), "a b c");
    }

    #[test]
    fn internal_blank_lines_are_preserved() {
        let content = "first line  \nsecond line";
        assert_eq!(normalize_whitespace(content), "first line\nsecond line");
    }

    #[test]
    fn store_round_trips_through_a_temp_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SnapshotStore::new(dir.path());
        store
            .save(Snapshot {
                name: "example".to_string(),
                content: "hello world".to_string(),
                metadata: HashMap::new(),
                created_at: "2026-01-29T12:00:00Z".to_string(),
                updated_at: "2026-01-29T12:00:00Z".to_string(),
            })
            .unwrap();

        let mut reloaded = SnapshotStore::new(dir.path());
        let found = reloaded.get("example").unwrap().unwrap();
        assert_eq!(found.content, "hello world");
        assert_eq!(reloaded.list_all().unwrap(), vec!["example".to_string()]);
    }

    #[test]
    fn mismatch_diff_reports_changed_lines() {
        let diff = assert_match("line one\nline two", "line one\nline three", &[]);
        assert!(!diff.is_match());
        assert!(diff.unified_diff().contains("-line two"));
        assert!(diff.unified_diff().contains("+line three"));
    }
}
