//! Error taxonomy for the Findable audit core.
//!
//! Analyzers never raise; they return partial
//! results with issue lists. Only `Input` at run start and `Persistence`
//! on final write are allowed to bubble out of the pipeline.

use thiserror::Error;

/// Core error types for the Findable system.
#[derive(Error, Debug)]
pub enum FindableError {
    /// Invalid URL or bad configuration. Aborts the run immediately.
    #[error("input error: {message}")]
    Input { message: String },

    /// Timeout, DNS failure, connection refused. Recorded per-URL, never fatal
    /// unless it blocks the start URL.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// Non-HTML, too short, or too large content. The page is skipped.
    #[error("content error for {url}: {message}")]
    Content { url: String, message: String },

    /// Malformed HTML/JSON-LD/XML. The analyzer returns a neutral/zero
    /// sub-score with an issue entry instead of propagating this.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Page or chunk limit hit. Normal termination, not a failure.
    #[error("capacity reached: {message}")]
    Capacity { message: String },

    /// Persistence unreachable. Fatal to writes; the run can still produce
    /// an in-memory score but is marked failed for audit-trail purposes.
    #[error("persistence error: {message}")]
    Persistence { message: String },

    /// The run's cancellation signal fired. Non-fatal; whatever is complete
    /// is still useful.
    #[error("run cancelled: {message}")]
    Cancelled { message: String },
}

impl FindableError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn content(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Content {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn capacity(message: impl Into<String>) -> Self {
        Self::Capacity {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Whether this error is the kind that should abort the whole run,
    /// affecting whether a run can still produce a usable score.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(self, FindableError::Input { .. } | FindableError::Persistence { .. })
    }
}

pub type FindableResult<T> = Result<T, FindableError>;
