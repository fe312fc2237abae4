//! Collapsible admin navigation.
//!
//! DESIGN
//! ======
//! Menu entries are static; the active entry is derived from the router
//! location so deep links highlight correctly.

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod sidebar_test;

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

pub struct MenuItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub path: &'static str,
}

pub const MENU_ITEMS: [MenuItem; 3] = [
    MenuItem {
        label: "Dashboard",
        icon: "▦",
        path: "/admin/dashboard",
    },
    MenuItem {
        label: "Profile",
        icon: "☺",
        path: "/admin/profile",
    },
    MenuItem {
        label: "Setting",
        icon: "⚙",
        path: "/admin/setting",
    },
];

/// Whether `item_path` should be highlighted for `current_path`.
pub fn is_active(current_path: &str, item_path: &str) -> bool {
    current_path == item_path
        || current_path
            .strip_prefix(item_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[component]
pub fn Sidebar(#[prop(into)] on_sign_out: Callback<()>) -> impl IntoView {
    let location = use_location();
    let open = RwSignal::new(true);

    view! {
        <nav class="sidebar" class:sidebar--collapsed=move || !open.get()>
            <div class="sidebar__header">
                <Show when=move || open.get()>
                    <span class="sidebar__brand">"HotelSocial"</span>
                </Show>
                <button
                    class="sidebar__toggle"
                    title="Toggle menu"
                    aria-label="Toggle menu"
                    on:click=move |_| open.update(|o| *o = !*o)
                >
                    "☰"
                </button>
            </div>
            <ul class="sidebar__menu">
                {MENU_ITEMS
                    .iter()
                    .map(|item| {
                        let path = item.path;
                        let active = move || location.pathname.with(|current| is_active(current, path));
                        view! {
                            <li class="sidebar__item" class:sidebar__item--active=active>
                                <A href=path>
                                    <span class="sidebar__icon">{item.icon}</span>
                                    <Show when=move || open.get()>
                                        <span class="sidebar__label">{item.label}</span>
                                    </Show>
                                </A>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <button class="sidebar__sign-out" on:click=move |_| on_sign_out.run(())>
                "Sign out"
            </button>
        </nav>
    }
}
