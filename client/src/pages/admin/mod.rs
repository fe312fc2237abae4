//! Admin shell: sidebar plus the nested `/admin/*` routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AdminLayout`] is the parent route. It waits for startup hydration,
//! then sends visitors without a session to sign-in and non-admin users to
//! the guest home page before rendering the child route in its [`Outlet`].

pub mod dashboard;
pub mod profile;
pub mod setting;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Outlet;
use leptos_router::hooks::use_navigate;

use crate::components::sidebar::Sidebar;
use crate::state::auth::SessionSignal;
use crate::util::auth::{admin_redirect, sign_out};

#[component]
pub fn AdminLayout() -> impl IntoView {
    let session = expect_context::<SessionSignal>();
    let navigate = use_navigate();

    let navigate_guard = navigate.clone();
    Effect::new(move || {
        if let Some(target) = session.with(|s| admin_redirect(s.state())) {
            navigate_guard(
                target,
                NavigateOptions {
                    replace: true,
                    ..NavigateOptions::default()
                },
            );
        }
    });

    let on_sign_out = Callback::new(move |()| sign_out(session, &navigate));
    let allowed = move || session.with(|s| s.state().user().is_some_and(|u| u.is_admin()));

    view! {
        <Show
            when=allowed
            fallback=|| view! { <div class="admin-layout__pending">"Loading..."</div> }
        >
            <div class="admin-layout">
                <Sidebar on_sign_out=on_sign_out/>
                <main class="admin-layout__content">
                    <Outlet/>
                </main>
            </div>
        </Show>
    }
}
