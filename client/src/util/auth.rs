//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same unauthenticated redirect, and
//! every sign-out button goes through the same session reset.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use hotelsocial_session::AuthState;
use hotelsocial_session::config::DEFAULT_SIGNIN_PATH;
use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::SessionSignal;

/// True once loading has finished and no user is present.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.is_loading() && state.user().is_none()
}

/// Where an admin route should send the current visitor, if anywhere:
/// sign-in without a user, home for non-admins, nowhere while loading.
pub fn admin_redirect(state: &AuthState) -> Option<&'static str> {
    if state.is_loading() {
        return None;
    }
    match state.user() {
        None => Some(DEFAULT_SIGNIN_PATH),
        Some(user) if !user.is_admin() => Some("/"),
        Some(_) => None,
    }
}

/// Redirect to sign-in whenever the session has loaded without a user.
pub fn install_unauth_redirect<F>(session: SessionSignal, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if session.with(|s| should_redirect_unauth(s.state())) {
            navigate(
                DEFAULT_SIGNIN_PATH,
                NavigateOptions {
                    replace: true,
                    ..NavigateOptions::default()
                },
            );
        }
    });
}

/// Clear tokens and the user, then return to sign-in.
pub fn sign_out<F>(session: SessionSignal, navigate: &F)
where
    F: Fn(&str, NavigateOptions),
{
    session.update(|s| s.logout());
    navigate(DEFAULT_SIGNIN_PATH, NavigateOptions::default());
}
