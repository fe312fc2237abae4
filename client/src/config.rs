//! Build-time API configuration for the browser build.
//!
//! The API origin is baked in at compile time from
//! `HOTELSOCIAL_API_BASE_URL`; when unset, requests go to the page's own
//! origin and a dev proxy forwards `/api`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use hotelsocial_session::ApiConfig;

/// Configuration used by every request the browser build makes.
pub fn api_config() -> ApiConfig {
    config_for(option_env!("HOTELSOCIAL_API_BASE_URL"))
}

fn config_for(base_url: Option<&str>) -> ApiConfig {
    base_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map_or_else(ApiConfig::default, ApiConfig::with_base_url)
}
