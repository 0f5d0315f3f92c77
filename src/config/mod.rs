//! Configuration module for the campaigner sync engine.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use chrono::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote API (e.g. `http://host/api/v1`)
    pub api_url: String,
    /// Path to SQLite database file backing the local store
    pub db_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// How long a downloaded voter list stays usable
    pub voter_ttl: Duration,
    /// How long downloaded issues stay usable
    pub issue_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api/v1".to_string(),
            db_path: "./data/campaigner.sqlite".into(),
            log_level: "info".to_string(),
            voter_ttl: Duration::hours(48),
            issue_ttl: Duration::days(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_url = env::var("CAMPAIGNER_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let db_path = env::var("CAMPAIGNER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let log_level = env::var("CAMPAIGNER_LOG_LEVEL").unwrap_or(defaults.log_level);

        let voter_ttl = match env::var("CAMPAIGNER_VOTER_TTL_HOURS") {
            Ok(raw) => parse_window("CAMPAIGNER_VOTER_TTL_HOURS", &raw, Duration::try_hours)?,
            Err(_) => defaults.voter_ttl,
        };

        let issue_ttl = match env::var("CAMPAIGNER_ISSUE_TTL_DAYS") {
            Ok(raw) => parse_window("CAMPAIGNER_ISSUE_TTL_DAYS", &raw, Duration::try_days)?,
            Err(_) => defaults.issue_ttl,
        };

        Ok(Self {
            api_url,
            db_path,
            log_level,
            voter_ttl,
            issue_ttl,
        })
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::Config(format!(
            "Invalid {} value: {:?} (expected a positive integer)",
            name, raw
        ))),
    }
}

/// Positive integer converted to a window by `unit`; values beyond what a
/// `Duration` can hold are rejected.
fn parse_window(
    name: &str,
    raw: &str,
    unit: fn(i64) -> Option<Duration>,
) -> Result<Duration, AppError> {
    let value = parse_positive(name, raw)?;
    unit(value).ok_or_else(|| {
        AppError::Config(format!("Invalid {} value: {} is out of range", name, value))
    })
}
