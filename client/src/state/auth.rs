//! Auth-session signal for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`App`](crate::app::App) provides one [`SessionSignal`] via context. Route
//! guards read it to decide on redirects; sign-in, sign-out, startup
//! hydration and the refresh loop write it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::time::Duration;

use hotelsocial_session::claims;
use hotelsocial_session::types::UserProfile;
use hotelsocial_session::{AuthSession, AuthUser};
use leptos::prelude::*;

use crate::net::browser::BrowserStorage;

/// Context type shared by every route.
pub type SessionSignal = RwSignal<AuthSession<BrowserStorage>>;

/// How often the refresh loop checks whether the access token is due.
pub const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Restore the persisted session and provide it to descendants.
pub fn provide_session() -> SessionSignal {
    let mut session = AuthSession::new(BrowserStorage);
    session.initialize();
    let signal = RwSignal::new(session);
    provide_context(signal);
    signal
}

/// The user for a freshly fetched profile, if the access token still carries
/// a complete identity.
pub fn hydrated_user(access_token: &str, profile: UserProfile) -> Option<AuthUser> {
    claims::user_info(access_token).map(|identity| AuthUser::from_parts(profile, identity))
}

/// Where a user lands after signing in.
pub fn landing_path(user: &AuthUser) -> &'static str {
    if user.is_admin() { "/admin/dashboard" } else { "/" }
}

/// Startup: refresh the pair if it is due, then re-fetch the profile so the
/// persisted snapshot is never trusted on its own.
#[cfg(feature = "csr")]
pub async fn bootstrap(session: SessionSignal) {
    use hotelsocial_session::error::is_auth_error;

    let api = crate::net::api::client_api();
    session.update(|s| s.set_loading(true));

    match api.refresh_if_needed(api.config().refresh_lead_minutes).await {
        Ok(Some(tokens)) => session.update(|s| s.set_tokens(Some(tokens))),
        Ok(None) => {}
        Err(e) => leptos::logging::warn!("startup token refresh failed: {e}"),
    }

    match api.tokens().tokens() {
        None => {
            if session.with_untracked(|s| s.state().user().is_some()) {
                leptos::logging::log!("no stored tokens, dropping stale user snapshot");
                session.update(AuthSession::logout);
            }
        }
        Some(tokens) => match api.current_user().await {
            Ok(profile) => match hydrated_user(&tokens.access_token, profile) {
                Some(user) => session.update(|s| {
                    s.set_tokens(Some(tokens));
                    s.set_user(Some(user));
                }),
                None => session.update(AuthSession::logout),
            },
            Err(e) => {
                leptos::logging::warn!("profile hydration failed: {e}");
                if is_auth_error(&e) {
                    session.update(AuthSession::logout);
                }
            }
        },
    }

    session.update(|s| s.set_loading(false));
}

/// Check once per [`REFRESH_CHECK_INTERVAL`] whether the access token is
/// inside the refresh window, until the owning scope is cleaned up.
#[cfg(feature = "csr")]
pub fn start_refresh_loop(session: SessionSignal) {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    let alive = Arc::new(AtomicBool::new(true));
    let alive_task = alive.clone();
    leptos::task::spawn_local(async move {
        loop {
            gloo_timers::future::sleep(REFRESH_CHECK_INTERVAL).await;
            if !alive_task.load(Ordering::Relaxed) {
                break;
            }
            let api = crate::net::api::client_api();
            match api.refresh_if_needed(api.config().refresh_lead_minutes).await {
                Ok(Some(tokens)) => session.update(|s| s.set_tokens(Some(tokens))),
                Ok(None) => {}
                Err(e) => leptos::logging::warn!("scheduled token refresh failed: {e}"),
            }
        }
    });
    on_cleanup(move || alive.store(false, Ordering::Relaxed));
}
