//! Client configuration.

use std::time::Duration;

/// Base URL used when none is supplied.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Immutable settings for a `ScraperApi`.
///
/// The base URL is not validated here; a malformed one fails on the first
/// request with `ApiError::Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}
