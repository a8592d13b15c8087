pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod models;

pub use client::HistoryClient;
pub use error::{HistoryError, Result};
pub use models::{Analysis, CheckResult, ProfileHistory, RateLimitStatus};
