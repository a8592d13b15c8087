use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::config::config::Config;
use crate::error::{HistoryError, Result};
use crate::models::{Analysis, CheckResult, RateLimitStatus};

/// Client identifier sent with every request.
pub const USER_AGENT: &str = concat!("handlecheck/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_ANALYZE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(10);

/// Progress callback for batch runs: (1-based index, total, username).
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize, &str);

/// Blocking client for the username-history API.
///
/// Owns one `reqwest` connection pool for its lifetime. Every operation is a
/// single request/response exchange; nothing is cached or retried.
#[derive(Clone)]
pub struct HistoryClient {
    base_url: String,
    client: reqwest::blocking::Client,
    check_timeout: Duration,
    analyze_timeout: Duration,
    status_timeout: Duration,
}

impl HistoryClient {
    /// Build a client against `base_url` with the default timeouts.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(
            base_url,
            USER_AGENT,
            DEFAULT_CHECK_TIMEOUT,
            DEFAULT_ANALYZE_TIMEOUT,
            DEFAULT_STATUS_TIMEOUT,
        )
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::build(
            &config.api.base_url,
            &config.api.user_agent,
            Duration::from_secs(config.api.check_timeout_secs),
            Duration::from_secs(config.api.analyze_timeout_secs),
            Duration::from_secs(config.api.status_timeout_secs),
        )
    }

    fn build(
        base_url: &str,
        user_agent: &str,
        check_timeout: Duration,
        analyze_timeout: Duration,
        status_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(HistoryError::Transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            check_timeout,
            analyze_timeout,
            status_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the change history for one username.
    ///
    /// A leading `@` is stripped before the username goes on the wire. 429
    /// maps to [`HistoryError::RateLimited`], any other non-200 to
    /// [`HistoryError::Api`] with the status and body.
    pub fn check_username_history(&self, username: &str) -> Result<CheckResult> {
        let username = normalize_username(username);
        tracing::debug!(target: "api", "checking history for @{}", username);

        self.post_json(
            "/api/check-username-history",
            &json!({ "username": username }),
            self.check_timeout,
        )
    }

    /// Full profile analysis (followers, following, network). The payload
    /// schema is not fixed, so the result is open JSON.
    pub fn analyze_profile(&self, username: &str) -> Result<Analysis> {
        let username = normalize_username(username);
        tracing::debug!(target: "api", "analyzing profile @{}", username);

        self.post_json(
            "/api/analyze",
            &json!({ "username": username }),
            self.analyze_timeout,
        )
    }

    /// Check a list of usernames sequentially with a fixed delay between
    /// requests (but not after the last one).
    ///
    /// Per-item failures are downgraded to `success = false` records so one
    /// bad username never aborts the run. The remote service rate limits,
    /// so no parallelism or retry is attempted here.
    pub fn batch_check(
        &self,
        usernames: &[String],
        delay: Duration,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> Vec<CheckResult> {
        let total = usernames.len();
        let mut results = Vec::with_capacity(total);

        for (i, username) in usernames.iter().enumerate() {
            match on_progress.as_mut() {
                Some(progress) => progress(i + 1, total, username.as_str()),
                None => println!("Checking {}/{}: @{}", i + 1, total, username),
            }

            match self.check_username_history(username) {
                Ok(result) => results.push(result.tagged(username)),
                Err(e) => {
                    tracing::warn!(target: "api", "check failed for @{}: {}", username, e);
                    results.push(CheckResult::failed(username, e));
                }
            }

            if i + 1 < total {
                thread::sleep(delay);
            }
        }

        results
    }

    /// Current rate-limit status. Never fails: transport or API errors come
    /// back as a map with an `error` key.
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        match self.get_json::<RateLimitStatus>("/api/rate-limit", self.status_timeout) {
            Ok(status) => status,
            Err(e) => {
                let mut status = Map::new();
                status.insert("error".to_string(), Value::String(e.to_string()));
                status
            }
        }
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .timeout(timeout)
            .json(body)
            .send()
            .map_err(|e| HistoryError::from_reqwest(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| HistoryError::from_reqwest(e, timeout))?;
        interpret_response(status, body)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .timeout(timeout)
            .send()
            .map_err(|e| HistoryError::from_reqwest(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| HistoryError::from_reqwest(e, timeout))?;
        interpret_response(status, body)
    }
}

/// Strip exactly one leading `@`; the API expects bare handles.
fn normalize_username(username: &str) -> &str {
    username.strip_prefix('@').unwrap_or(username)
}

/// Map a raw status/body pair to the typed result. 429 wins over the
/// generic API error; only an exact 200 is treated as success.
fn interpret_response<T: DeserializeOwned>(status: StatusCode, body: String) -> Result<T> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(HistoryError::RateLimited);
    }
    if status != StatusCode::OK {
        return Err(HistoryError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}
