use std::time::Duration;

use rental_core::guard::FORCE_LOGOUT_AFTER;

use crate::refresh::DEFAULT_REFRESH_PATH;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_KEEPALIVE_INTERVAL_SECS: u64 = 14 * 60;
const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub refresh_path: String,
    pub keepalive_interval: Duration,
    pub keepalive_timeout: Duration,
    pub force_logout_after: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            keepalive_interval: Duration::from_secs(DEFAULT_KEEPALIVE_INTERVAL_SECS),
            keepalive_timeout: KEEPALIVE_TIMEOUT,
            force_logout_after: FORCE_LOGOUT_AFTER,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_secs(name: &str, default: u64) -> Duration {
    let secs = env_string(name)
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default);
    Duration::from_secs(secs)
}

impl ClientConfig {
    /// Read `RENTAL_API_URL`, `RENTAL_REQUEST_TIMEOUT_SECS` and
    /// `RENTAL_KEEPALIVE_INTERVAL_SECS`, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            base_url: env_string("RENTAL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: env_secs("RENTAL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            keepalive_interval: env_secs(
                "RENTAL_KEEPALIVE_INTERVAL_SECS",
                DEFAULT_KEEPALIVE_INTERVAL_SECS,
            ),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
