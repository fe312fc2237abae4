//! `/admin/setting` placeholder.

use leptos::prelude::*;

#[component]
pub fn SettingPage() -> impl IntoView {
    view! {
        <section class="admin-page">
            <h1 class="admin-page__title">"Settings"</h1>
            <p class="admin-page__subtitle">"System configuration and preferences"</p>
        </section>
    }
}
