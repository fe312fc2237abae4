//! "Or continue with" row of third-party sign-in buttons.

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Facebook,
}

impl SocialProvider {
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Facebook => "Facebook",
        }
    }
}

#[component]
pub fn SocialLogin(
    #[prop(into)] on_select: Callback<SocialProvider>,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let button = move |provider: SocialProvider| {
        view! {
            <button
                type="button"
                class="social-login__button"
                class:social-login__button--google={provider == SocialProvider::Google}
                class:social-login__button--facebook={provider == SocialProvider::Facebook}
                disabled=move || disabled.get()
                on:click=move |_| on_select.run(provider)
            >
                {provider.label()}
            </button>
        }
    };

    view! {
        <div class="social-login">
            <div class="social-login__divider">
                <span>"Or continue with"</span>
            </div>
            <div class="social-login__buttons">
                {button(SocialProvider::Google)}
                {button(SocialProvider::Facebook)}
            </div>
        </div>
    }
}
