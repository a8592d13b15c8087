use std::time::Duration;

/// Errors surfaced by the history API client and the export helpers.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The API answered 429. The remote rate limiter wants us to back off.
    #[error("rate limit exceeded, wait before making another request")]
    RateLimited,

    /// Any other non-200 answer from the API.
    #[error("API returned status code {status}: {body}")]
    Api { status: u16, body: String },

    /// The request did not complete within the per-call timeout.
    #[error("request timed out after {} seconds", .timeout.as_secs())]
    Timeout { timeout: Duration },

    /// Connection-level failure (DNS, refused, TLS, ...).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Export was asked for a format it does not know.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl HistoryError {
    /// Classify a failed `reqwest` call, preserving the timeout that was in
    /// effect so the message can name it.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            HistoryError::Timeout { timeout }
        } else {
            HistoryError::Transport(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
