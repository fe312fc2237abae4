//! Guest landing page at `/`.
//!
//! Protected: the unauthenticated redirect sends signed-out visitors to
//! sign-in once startup hydration finishes.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use hotelsocial_session::AuthUser;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::state::auth::SessionSignal;
use crate::util::auth::{install_unauth_redirect, sign_out};

/// Headline for the signed-in user.
pub fn greeting(user: &AuthUser) -> String {
    format!("Welcome back, {}!", user.display_name())
}

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<SessionSignal>();
    let navigate = use_navigate();
    install_unauth_redirect(session, navigate.clone());

    let user = Memo::new(move |_| session.with(|s| s.state().user().cloned()));
    let notice = RwSignal::new(None::<String>);
    let sending = RwSignal::new(false);

    let on_resend = move |_| {
        let Some(email) = user.with_untracked(|u| u.as_ref().map(|u| u.email.clone())) else {
            return;
        };
        sending.set(true);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use hotelsocial_session::error::user_message;
            use hotelsocial_session::types::SendConfirmEmailPayload;

            let payload = SendConfirmEmailPayload {
                email: email.clone(),
                client_url: crate::net::browser::current_origin(),
            };
            match crate::net::api::client_api().send_confirm_email(&payload).await {
                Ok(_) => notice.set(Some(format!("Confirmation email sent to {email}."))),
                Err(e) => {
                    leptos::logging::warn!("resend confirmation failed: {e}");
                    notice.set(Some(user_message(&e)));
                }
            }
            sending.set(false);
        });
    };

    let on_sign_out = move |_| sign_out(session, &navigate);

    view! {
        <Show
            when=move || user.with(Option::is_some)
            fallback=move || {
                view! {
                    <div class="home-page">
                        <p>
                            {move || {
                                if session.with(|s| s.state().is_loading()) {
                                    "Loading..."
                                } else {
                                    "Redirecting to sign in..."
                                }
                            }}
                        </p>
                    </div>
                }
            }
        >
            <div class="home-page">
                <header class="home-page__header">
                    <span class="home-page__brand">"HotelSocial"</span>
                    <span class="home-page__spacer"></span>
                    <Show when=move || user.with(|u| u.as_ref().is_some_and(AuthUser::is_admin))>
                        <A href="/admin/dashboard">"Admin"</A>
                    </Show>
                    <button class="btn home-page__sign-out" on:click=on_sign_out.clone()>
                        "Sign out"
                    </button>
                </header>
                <main class="home-page__body">
                    <h1>{move || user.with(|u| u.as_ref().map(greeting).unwrap_or_default())}</h1>
                    <p class="home-page__email">
                        {move || user.with(|u| u.as_ref().map(|u| u.email.clone()).unwrap_or_default())}
                    </p>
                    <Show when=move || user.with(|u| u.as_ref().is_some_and(|u| !u.email_confirmed))>
                        <div class="home-page__confirm">
                            <p>"Your email address has not been confirmed yet."</p>
                            <button
                                class="btn"
                                disabled=move || sending.get()
                                on:click=on_resend
                            >
                                "Resend confirmation email"
                            </button>
                        </div>
                    </Show>
                    <Show when=move || notice.get().is_some()>
                        <p class="home-page__notice">{move || notice.get().unwrap_or_default()}</p>
                    </Show>
                </main>
            </div>
        </Show>
    }
}
