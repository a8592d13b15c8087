//! Configuration module
//!
//! API endpoint, timeouts and batch pacing, loaded from a TOML file in the
//! platform config directory.

pub mod config;
