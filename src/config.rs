//! Environment configuration.

use std::env;
use std::time::Duration;

pub const ENV_ENDPOINT: &str = "TRUCK_PAGER_ENDPOINT";
pub const ENV_FETCHER: &str = "TRUCK_PAGER_FETCHER";
pub const ENV_TIMEOUT_MS: &str = "TRUCK_PAGER_TIMEOUT_MS";
pub const ENV_LOG: &str = "TRUCK_PAGER_LOG";
pub const ENV_DEBUG: &str = "TRUCK_PAGER_DEBUG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Resource endpoint override.
    pub endpoint: Option<String>,
    /// Fetcher selection (`soda` or `mock`).
    pub fetcher: Option<String>,
    /// Per-request timeout; unset, zero or unparseable values mean none.
    pub timeout: Option<Duration>,
    /// Log file path. Logs go to stderr when unset.
    pub log_file: Option<String>,
    pub debug: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: env_string_opt(ENV_ENDPOINT),
            fetcher: env_string_opt(ENV_FETCHER).map(|value| value.trim().to_ascii_lowercase()),
            timeout: env_string_opt(ENV_TIMEOUT_MS)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis),
            log_file: env_string_opt(ENV_LOG),
            debug: env_flag(ENV_DEBUG),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
