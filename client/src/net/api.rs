//! Browser wiring of the session request layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components build a fresh [`ClientApi`] inside each spawned task. It is
//! cheap (the adapters are zero-sized, the config is a few strings) and
//! keeps `!Send` futures out of Leptos context.

use hotelsocial_session::{AuthApi, TokenStore};

use super::browser::{BrowserNavigator, BrowserStorage};
use super::transport::GlooTransport;
use crate::config::api_config;

/// The auth API over `fetch`, `localStorage` and `window.location`.
pub type ClientApi = AuthApi<GlooTransport, BrowserStorage>;

pub fn client_api() -> ClientApi {
    let config = api_config();
    AuthApi::new(
        GlooTransport::new(config.clone()),
        TokenStore::new(BrowserStorage),
        BrowserNavigator,
        &config,
    )
}
