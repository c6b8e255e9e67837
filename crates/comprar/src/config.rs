//! Harness configuration.
//!
//! One config per session, resolved once at construction. Environment
//! variables override the built-in defaults so CI can retarget the suite
//! without code changes.

use crate::retry::RetryPolicy;
use crate::wait::WaitOptions;

/// Default storefront the suite targets
pub const DEFAULT_BASE_URL: &str = "http://demowebshop.tricentis.com";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "COMPRAR_BASE_URL";

/// Environment variable overriding the wait timeout (milliseconds)
pub const ENV_TIMEOUT_MS: &str = "COMPRAR_TIMEOUT_MS";

/// Environment variable overriding the poll interval (milliseconds)
pub const ENV_POLL_INTERVAL_MS: &str = "COMPRAR_POLL_INTERVAL_MS";

/// Configuration for a harness session.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the storefront under test
    pub base_url: String,
    /// Wait settings shared by every synchronized operation
    pub wait: WaitOptions,
    /// Retry policy for eventually-observable conditions
    pub retry: RetryPolicy,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            wait: WaitOptions::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL, trimming a trailing slash
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the wait options
    #[must_use]
    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build a config from defaults plus environment overrides.
    ///
    /// Unparsable numeric values are ignored, keeping the default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        if let Some(ms) = env_ms(ENV_TIMEOUT_MS) {
            config.wait = config.wait.with_timeout(ms);
        }
        if let Some(ms) = env_ms(ENV_POLL_INTERVAL_MS) {
            config.wait = config.wait.with_poll_interval(ms);
        }
        config
    }

    /// Absolute URL for a path under the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn env_ms(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.parse().ok()
}
