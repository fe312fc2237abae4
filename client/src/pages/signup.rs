//! Customer registration form.
//!
//! Registration does not sign the user in: on success the page shows the
//! API's message and flips back to the sign-in form after a short pause.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::components::loading_button::LoadingButton;
use crate::components::social_login::{SocialLogin, SocialProvider};
use crate::pages::signin::start_social_login;
use crate::util::validation::{
    FIELD_AGREE_TERMS, FIELD_CONFIRM_PASSWORD, FIELD_EMAIL, FIELD_FULL_NAME, FIELD_PASSWORD,
    FIELD_PHONE_NUMBER, FieldErrors, SignUpValues, validate_sign_up,
};

/// Shown when the API accepts a registration without a message of its own.
pub const DEFAULT_REGISTERED_MESSAGE: &str =
    "Registration successful. Check your email to confirm your account.";

/// Notice for an accepted registration.
pub fn registered_notice(api_message: &str) -> String {
    let trimmed = api_message.trim();
    if trimmed.is_empty() {
        DEFAULT_REGISTERED_MESSAGE.to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[component]
pub fn SignUpForm(#[prop(into)] on_switch: Callback<()>) -> impl IntoView {
    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let phone_number = RwSignal::new(String::new());
    let agree_terms = RwSignal::new(false);
    let errors = RwSignal::new(FieldErrors::default());
    let notice = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let values = SignUpValues {
            full_name: full_name.get_untracked().trim().to_owned(),
            email: email.get_untracked().trim().to_owned(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
            phone_number: phone_number.get_untracked().trim().to_owned(),
            agree_terms: agree_terms.get_untracked(),
        };
        if let Err(field_errors) = validate_sign_up(&values) {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::default());
        notice.set(None);
        busy.set(true);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use hotelsocial_session::error::user_message;
            use hotelsocial_session::types::RegisterPayload;

            let payload = RegisterPayload {
                full_name: values.full_name,
                email: values.email,
                password: values.password,
                confirm_password: values.confirm_password,
                phone_number: values.phone_number,
            };
            match crate::net::api::client_api().register(&payload).await {
                Ok(ack) => {
                    leptos::logging::log!("registered {}", payload.email);
                    notice.set(Some(registered_notice(&ack.message)));
                    gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
                    busy.set(false);
                    on_switch.run(());
                }
                Err(e) => {
                    leptos::logging::warn!("registration failed: {e}");
                    notice.set(Some(user_message(&e)));
                    busy.set(false);
                }
            }
        });
    };

    let field_error = move |field: &'static str| {
        move || {
            errors
                .with(|e| e.get(field))
                .map(|message| view! { <p class="auth-form__error">{message}</p> })
        }
    };

    let text_field = move |label: &'static str,
                           kind: &'static str,
                           autocomplete: &'static str,
                           value: RwSignal<String>,
                           field: &'static str| {
        view! {
            <label class="auth-form__field">
                <span>{label}</span>
                <input
                    class="auth-form__input"
                    type=kind
                    autocomplete=autocomplete
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
                {field_error(field)}
            </label>
        }
    };

    view! {
        <form class="auth-form" on:submit=on_submit novalidate=true>
            <h2 class="auth-form__title">"Create an account"</h2>
            {text_field("Full name", "text", "name", full_name, FIELD_FULL_NAME)}
            {text_field("Email", "email", "email", email, FIELD_EMAIL)}
            {text_field("Phone number", "tel", "tel", phone_number, FIELD_PHONE_NUMBER)}
            {text_field("Password", "password", "new-password", password, FIELD_PASSWORD)}
            {text_field(
                "Confirm password",
                "password",
                "new-password",
                confirm_password,
                FIELD_CONFIRM_PASSWORD,
            )}
            <label class="auth-form__checkbox">
                <input
                    type="checkbox"
                    prop:checked=move || agree_terms.get()
                    on:change=move |ev| agree_terms.set(event_target_checked(&ev))
                />
                <span>"I agree to the terms of use and privacy policy"</span>
            </label>
            {field_error(FIELD_AGREE_TERMS)}
            <LoadingButton loading=busy loading_text="Creating account...">
                "Sign up"
            </LoadingButton>
            <Show when=move || notice.get().is_some()>
                <p class="auth-form__notice">{move || notice.get().unwrap_or_default()}</p>
            </Show>
            <SocialLogin
                on_select=move |provider: SocialProvider| start_social_login(provider, notice)
                disabled=busy
            />
            <p class="auth-form__switch">
                "Already have an account? "
                <button type="button" class="auth-form__link" on:click=move |_| on_switch.run(())>
                    "Sign in"
                </button>
            </p>
        </form>
    }
}
