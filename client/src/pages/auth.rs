//! `/auth/signin` and `/auth/signup`: one card that flips between the two
//! forms.
//!
//! SYSTEM CONTEXT
//! ==============
//! The mode follows the URL so both forms are deep-linkable. A visitor who
//! already has a session is sent straight to their landing route.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::pages::signin::SignInForm;
use crate::pages::signup::SignUpForm;
use crate::state::auth::{SessionSignal, landing_path};

pub const SIGNIN_PATH: &str = "/auth/signin";
pub const SIGNUP_PATH: &str = "/auth/signup";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    /// Mode for a router path. Anything other than the sign-up route shows
    /// the sign-in form.
    pub fn from_path(path: &str) -> Self {
        if path.trim_end_matches('/') == SIGNUP_PATH {
            Self::SignUp
        } else {
            Self::SignIn
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::SignIn => SIGNIN_PATH,
            Self::SignUp => SIGNUP_PATH,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let session = expect_context::<SessionSignal>();
    let location = use_location();
    let navigate = use_navigate();

    let mode = Memo::new(move |_| location.pathname.with(|path| AuthMode::from_path(path)));

    let navigate_home = navigate.clone();
    Effect::new(move || {
        let landing = session.with(|s| {
            let state = s.state();
            if state.is_loading() {
                None
            } else {
                state.user().map(landing_path)
            }
        });
        if let Some(landing) = landing {
            navigate_home(
                landing,
                NavigateOptions {
                    replace: true,
                    ..NavigateOptions::default()
                },
            );
        }
    });

    let switch = Callback::new(move |()| {
        navigate(mode.get_untracked().toggled().path(), NavigateOptions::default());
    });

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1 class="auth-card__brand">"HotelSocial"</h1>
                <div class="auth-card__tabs">
                    <button
                        type="button"
                        class="auth-card__tab"
                        class:auth-card__tab--active=move || mode.get() == AuthMode::SignIn
                        on:click=move |_| {
                            if mode.get_untracked() != AuthMode::SignIn {
                                switch.run(());
                            }
                        }
                    >
                        "Sign in"
                    </button>
                    <button
                        type="button"
                        class="auth-card__tab"
                        class:auth-card__tab--active=move || mode.get() == AuthMode::SignUp
                        on:click=move |_| {
                            if mode.get_untracked() != AuthMode::SignUp {
                                switch.run(());
                            }
                        }
                    >
                        "Sign up"
                    </button>
                </div>
                {move || match mode.get() {
                    AuthMode::SignIn => view! { <SignInForm on_switch=switch/> }.into_any(),
                    AuthMode::SignUp => view! { <SignUpForm on_switch=switch/> }.into_any(),
                }}
            </div>
        </div>
    }
}
