//! Email + password sign-in form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Submitting validates locally, then runs the session `sign_in` flow
//! (login, identity-claim gate, profile fetch). Success hands the result to
//! the session signal and navigates to the role's landing route.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::loading_button::LoadingButton;
use crate::components::social_login::{SocialLogin, SocialProvider};
use crate::state::auth::SessionSignal;
use crate::util::validation::{
    FIELD_EMAIL, FIELD_PASSWORD, FieldErrors, SignInValues, email_error, validate_sign_in,
};

/// Message shown for providers the API has no handoff for.
pub(crate) fn unsupported_provider_message(provider: SocialProvider) -> String {
    format!("{} sign-in is not available yet.", provider.label())
}

/// Start the Google handoff, or report why a provider cannot be used.
pub(crate) fn start_social_login(provider: SocialProvider, notice: RwSignal<Option<String>>) {
    match provider {
        SocialProvider::Google => {
            #[cfg(feature = "csr")]
            {
                use hotelsocial_session::Navigator as _;

                let url = crate::net::api::client_api().google_login_url();
                crate::net::browser::BrowserNavigator.redirect(&url);
            }
        }
        SocialProvider::Facebook => notice.set(Some(unsupported_provider_message(provider))),
    }
}

#[component]
pub fn SignInForm(#[prop(into)] on_switch: Callback<()>) -> impl IntoView {
    let session = expect_context::<SessionSignal>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let notice = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let values = SignInValues {
            email: email.get_untracked().trim().to_owned(),
            password: password.get_untracked(),
        };
        if let Err(field_errors) = validate_sign_in(&values) {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::default());
        notice.set(None);
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            use hotelsocial_session::error::user_message;
            use hotelsocial_session::types::LoginPayload;
            use leptos_router::NavigateOptions;

            use crate::state::auth::landing_path;

            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let payload = LoginPayload {
                    email: values.email,
                    password: values.password,
                };
                session.update(|s| s.set_loading(true));
                match crate::net::api::client_api().sign_in(&payload).await {
                    Ok(signed_in) => {
                        let landing = landing_path(&signed_in.user);
                        leptos::logging::log!("signed in as {}", signed_in.user.email);
                        session.update(|s| {
                            s.apply_sign_in(signed_in);
                            s.set_loading(false);
                        });
                        navigate(landing, NavigateOptions::default());
                    }
                    Err(e) => {
                        leptos::logging::warn!("sign in failed: {e}");
                        notice.set(Some(user_message(&e)));
                        session.update(|s| s.set_loading(false));
                    }
                }
                busy.set(false);
            });
        }
    };

    let on_forgot = move |_| {
        let address = email.get_untracked().trim().to_owned();
        if email_error(&address).is_some() {
            notice.set(Some("Enter your account email above to reset your password.".to_owned()));
            return;
        }
        busy.set(true);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use hotelsocial_session::error::user_message;
            use hotelsocial_session::types::ForgotPasswordPayload;

            let payload = ForgotPasswordPayload {
                email: address.clone(),
                client_url: format!("{}/auth/signin", crate::net::browser::current_origin()),
            };
            match crate::net::api::client_api().forgot_password(&payload).await {
                Ok(_) => notice.set(Some(format!(
                    "Password reset instructions were sent to {address}."
                ))),
                Err(e) => notice.set(Some(user_message(&e))),
            }
            busy.set(false);
        });
    };

    let field_error = move |field: &'static str| {
        move || {
            errors
                .with(|e| e.get(field))
                .map(|message| view! { <p class="auth-form__error">{message}</p> })
        }
    };

    view! {
        <form class="auth-form" on:submit=on_submit novalidate=true>
            <h2 class="auth-form__title">"Sign in"</h2>
            <label class="auth-form__field">
                <span>"Email"</span>
                <input
                    class="auth-form__input"
                    type="email"
                    autocomplete="email"
                    placeholder="you@example.com"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                {field_error(FIELD_EMAIL)}
            </label>
            <label class="auth-form__field">
                <span>"Password"</span>
                <input
                    class="auth-form__input"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                {field_error(FIELD_PASSWORD)}
            </label>
            <button type="button" class="auth-form__link" on:click=on_forgot>
                "Forgot password?"
            </button>
            <LoadingButton loading=busy loading_text="Signing in...">
                "Sign in"
            </LoadingButton>
            <Show when=move || notice.get().is_some()>
                <p class="auth-form__notice">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <SocialLogin
                on_select=move |provider: SocialProvider| start_social_login(provider, notice)
                disabled=busy
            />
            <p class="auth-form__switch">
                "No account yet? "
                <button type="button" class="auth-form__link" on:click=move |_| on_switch.run(())>
                    "Sign up"
                </button>
            </p>
        </form>
    }
}
