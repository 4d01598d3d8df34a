//! Run lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Crawl,
    Extract,
    Analyze,
    Index,
    Simulate,
    Score,
}

impl RunPhase {
    pub const ORDER: [RunPhase; 6] = [
        RunPhase::Crawl,
        RunPhase::Extract,
        RunPhase::Analyze,
        RunPhase::Index,
        RunPhase::Simulate,
        RunPhase::Score,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress(RunPhase),
    Completed,
    CompletedPartial,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub site_id: String,
    pub run_type: String,
    pub status: RunStatus,
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
