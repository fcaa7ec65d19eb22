//! Client configuration.

use std::time::Duration;

/// Default backend location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Per-request timeout. AI endpoints can take minutes.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
