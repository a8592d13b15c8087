use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One answer from the history endpoint.
///
/// `username` and `timestamp` are not part of the wire response; the batch
/// loop (and the CLI when saving a single result) stamps them so exported
/// records stay self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProfileHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl CheckResult {
    /// Record a per-item failure without aborting the surrounding batch.
    pub fn failed(username: &str, error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            message: None,
            username: Some(username.to_string()),
            timestamp: Some(capture_timestamp()),
        }
    }

    /// Tag a wire response with the username it was requested for and the
    /// moment it was captured.
    pub fn tagged(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self.timestamp = Some(capture_timestamp());
        self
    }
}

/// The documented part of a successful check. The remote schema is not
/// contractually fixed, so every field defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileHistory {
    pub current_username: String,
    pub is_clean: bool,
    pub total_changes: u64,
    pub history: Vec<String>,
    pub insights: Vec<String>,
}

/// Rate-limit status is free-form; the API does not commit to a schema and
/// we pass it through unmodified.
pub type RateLimitStatus = Map<String, Value>;

/// Analysis payloads are arbitrary JSON. Callers navigate with
/// [`Value::pointer`]; the documented fields are `profile.followers_count`,
/// `profile.following_count` and `network`.
pub type Analysis = Value;

pub(crate) fn capture_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
