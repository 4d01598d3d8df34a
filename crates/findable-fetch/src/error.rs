use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {elapsed_ms}ms")]
    Timeout { url: String, elapsed_ms: u64 },

    #[error("dns or connection failure fetching {url}: {message}")]
    Connection { url: String, message: String },

    #[error("{url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} has non-html content type {content_type}")]
    ContentTypeRejected { url: String, content_type: String },

    #[error("{url} exceeded the redirect limit of {limit}")]
    TooManyRedirects { url: String, limit: u32 },

    #[error("{url} is disallowed by robots.txt")]
    RobotsDisallowed { url: String },

    #[error("circuit open for host {host}, skipping {url}")]
    CircuitOpen { host: String, url: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether this failure reflects a policy decision (robots, circuit
    /// open) rather than a transport-level fault, for callers that want to
    /// log those differently.
    pub fn is_policy_skip(&self) -> bool {
        matches!(
            self,
            FetchError::RobotsDisallowed { .. } | FetchError::CircuitOpen { .. }
        )
    }
}
