//! Submit button with an inline busy state.

use leptos::prelude::*;

/// Button that disables itself and shows a spinner while `loading` is true.
/// With `loading_text`, that text replaces the label while busy.
#[component]
pub fn LoadingButton(
    #[prop(into)] loading: Signal<bool>,
    #[prop(optional)] loading_text: Option<&'static str>,
    #[prop(default = "submit")] button_type: &'static str,
    #[prop(optional)] on_click: Option<Callback<()>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type=button_type
            class="loading-button"
            class:loading-button--busy=move || loading.get()
            disabled=move || loading.get()
            on:click=move |_| {
                if let Some(on_click) = on_click.as_ref() {
                    on_click.run(());
                }
            }
        >
            <Show when=move || loading.get()>
                <span class="loading-button__spinner" aria-hidden="true"></span>
            </Show>
            <span
                class="loading-button__label"
                class:loading-button__label--hidden=move || loading.get()
            >
                {children()}
            </span>
            {loading_text
                .map(|text| {
                    view! {
                        <Show when=move || loading.get()>
                            <span class="loading-button__label">{text}</span>
                        </Show>
                    }
                })}
        </button>
    }
}
