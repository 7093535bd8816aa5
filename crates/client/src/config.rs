//! Client configuration from environment variables.

use std::time::Duration;

use crate::refresh_gate::DEFAULT_REFRESH_COOLDOWN;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base address of the prediction service, without a trailing slash.
    /// Empty means same-origin (the web build served next to the API).
    pub api_url: String,
    pub refresh_cooldown: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    ///
    /// Environment variables:
    /// - `COURTSIDE_API_URL`: service base address (default: the value baked in
    ///   at compile time, else "http://localhost:8000")
    /// - `COURTSIDE_REFRESH_COOLDOWN_MS`: manual refresh cool-down (default: 2000)
    /// - `COURTSIDE_REQUEST_TIMEOUT_SECS`: native request timeout (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("COURTSIDE_API_URL")
            .or_else(|| option_env!("COURTSIDE_API_URL").map(str::to_string))
            .and_then(|raw| {
                let normalized = normalize_api_url(&raw);
                if normalized.is_none() {
                    crate::log_warn!("ignoring invalid COURTSIDE_API_URL {:?}", raw);
                }
                normalized
            })
            .unwrap_or(defaults.api_url);

        let refresh_cooldown = parse_number(&lookup, "COURTSIDE_REFRESH_COOLDOWN_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.refresh_cooldown);

        let request_timeout = parse_number(&lookup, "COURTSIDE_REQUEST_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            api_url,
            refresh_cooldown,
            request_timeout,
        }
    }
}

fn parse_number(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            crate::log_warn!("ignoring non-numeric {}={:?}", name, raw);
            None
        }
    }
}

/// Accepts an absolute http(s) URL or an empty string (same-origin).
fn normalize_api_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(String::new());
    }
    let parsed = url::Url::parse(trimmed).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    Some(trimmed.trim_end_matches('/').to_string())
}
