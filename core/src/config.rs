//! Client configuration.
//!
//! `SdkConfig` is fixed once a `SwarmClient` is built. Zero values for the
//! timeout, attempt count and retry delay mean "use the default", so a
//! config deserialized or assembled from partial input never disables
//! retries by accident.

use std::fmt;
use std::time::Duration;

use crate::error::SwarmError;
use crate::http::merge_header;

pub const DEFAULT_BASE_URL: &str = "https://prometheusswarm.ai";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

pub const API_KEY_ENV: &str = "PROMETHEUS_API_KEY";
pub const BASE_URL_ENV: &str = "PROMETHEUS_BASE_URL";

/// Settings for a `SwarmClient`.
#[derive(Clone)]
pub struct SdkConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) retry_attempts: u32,
    pub(crate) retry_delay: Duration,
    pub(crate) headers: Vec<(String, String)>,
}

impl SdkConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            headers: Vec::new(),
        }
    }

    /// Build from `PROMETHEUS_API_KEY` and, if set, `PROMETHEUS_BASE_URL`.
    pub fn from_env() -> Result<Self, SwarmError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SwarmError::Config("API key is required".to_string()))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.base_url(base_url);
        }
        Ok(config)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };
        self
    }

    /// Total number of attempts, including the first.
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = if attempts == 0 {
            DEFAULT_RETRY_ATTEMPTS
        } else {
            attempts
        };
        self
    }

    /// Base backoff; attempt `n` waits `delay * n` before the next try.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = if delay.is_zero() {
            DEFAULT_RETRY_DELAY
        } else {
            delay
        };
        self
    }

    /// Extra header sent on every request. Later values win over earlier
    /// ones and over the built-in `Content-Type` and `Authorization`.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        merge_header(&mut self.headers, &name.into(), &value.into());
        self
    }

    /// Effective settings, without the credential.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            retry_attempts: self.retry_attempts,
            retry_delay: self.retry_delay,
            has_api_key: !self.api_key.is_empty(),
        }
    }
}

impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay", &self.retry_delay)
            .field("headers", &self.headers.len())
            .finish()
    }
}

/// What `SwarmClient::config` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSummary {
    pub base_url: String,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub has_api_key: bool,
}
