//! Request-layer configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::claims::DEFAULT_REFRESH_LEAD_MINUTES;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Route of the sign-in screen that 401 responses redirect to.
pub const DEFAULT_SIGNIN_PATH: &str = "/auth/signin";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Origin prefixed to every request path. Empty means same origin.
    pub base_url: String,
    pub timeout: Duration,
    pub refresh_lead_minutes: u32,
    pub signin_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            refresh_lead_minutes: DEFAULT_REFRESH_LEAD_MINUTES,
            signin_path: DEFAULT_SIGNIN_PATH.to_owned(),
        }
    }
}

impl ApiConfig {
    /// Config for `base_url` with default timing.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Absolute (or same-origin) URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
