use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REPORT_PATH: &str = "plan_semanal.pdf";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Front-end configuration loaded from environment variables.
/// Every variable has a default; only malformed values are rejected.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external evaluation service.
    pub service_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout: Duration,
    /// Where the exported meal-plan document is written when no path is given.
    pub report_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            service_url: std::env::var("SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            report_path: std::env::var("REPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_REPORT_PATH)),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            rust_log: "info".to_string(),
        }
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"))?;
    anyhow::ensure!(secs > 0, "REQUEST_TIMEOUT_SECS must be greater than zero");
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_accepts_whole_seconds() {
        assert_eq!(parse_timeout(" 45 ").unwrap(), 45);
    }

    #[test]
    fn test_parse_timeout_rejects_zero_and_garbage() {
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn test_default_config_points_at_local_service() {
        let config = Config::default();
        assert_eq!(config.service_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.report_path, PathBuf::from("plan_semanal.pdf"));
    }
}
