//! `/admin/dashboard`: paged, searchable user directory.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads `GET /api/Auth/` with the page number and search term held in
//! local signals. Each change of either refetches; a stale response that
//! lands after a newer request is dropped by comparing request serials.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use hotelsocial_session::types::{PaginatedResponse, UserListQuery, UserProfile};
use leptos::prelude::*;

pub const PAGE_SIZE: u32 = 10;

/// Query for one dashboard page. Blank search terms are omitted.
pub fn page_query(page_number: u32, search: &str) -> UserListQuery {
    let search = search.trim();
    UserListQuery {
        page_number: Some(page_number.max(1)),
        page_size: Some(PAGE_SIZE),
        search_term: (!search.is_empty()).then(|| search.to_owned()),
        ..UserListQuery::default()
    }
}

/// "Page 2 of 5 · 42 users".
pub fn page_summary<T>(page: &PaginatedResponse<T>) -> String {
    let noun = if page.total_count == 1 { "user" } else { "users" };
    format!(
        "Page {} of {} · {} {noun}",
        page.page_number,
        page.total_pages.max(1),
        page.total_count
    )
}

fn cell(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| "-".to_owned())
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let page_number = RwSignal::new(1_u32);
    let search = RwSignal::new(String::new());
    let page = RwSignal::new(None::<PaginatedResponse<UserProfile>>);
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(false);
    let serial = StoredValue::new(0_u64);

    Effect::new(move || {
        let query = page_query(page_number.get(), &search.get());
        serial.update_value(|n| *n += 1);
        let current = serial.get_value();
        loading.set(true);
        error.set(None);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use hotelsocial_session::error::user_message;

            let result = crate::net::api::client_api().list_users(&query).await;
            if serial.get_value() != current {
                return;
            }
            match result {
                Ok(next) => page.set(Some(next)),
                Err(e) => {
                    leptos::logging::warn!("user list failed: {e}");
                    error.set(Some(user_message(&e)));
                }
            }
            loading.set(false);
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (query, current);
        }
    });

    let has_previous = move || page.with(|p| p.as_ref().is_some_and(|p| p.has_previous_page));
    let has_next = move || page.with(|p| p.as_ref().is_some_and(|p| p.has_next_page));

    view! {
        <section class="admin-page">
            <h1 class="admin-page__title">"Dashboard"</h1>
            <p class="admin-page__subtitle">"Registered users"</p>
            <input
                class="admin-page__search"
                type="search"
                placeholder="Search by name or email"
                prop:value=move || search.get()
                on:change=move |ev| {
                    search.set(event_target_value(&ev));
                    page_number.set(1);
                }
            />
            <Show when=move || error.get().is_some()>
                <p class="admin-page__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <table class="user-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Phone"</th>
                        <th>"Confirmed"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        page.get()
                            .map(|p| p.items)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|user| {
                                view! {
                                    <tr>
                                        <td>{cell(user.full_name.as_ref().or(user.username.as_ref()))}</td>
                                        <td>{user.email}</td>
                                        <td>{cell(user.phone_number.as_ref())}</td>
                                        <td>{if user.email_confirmed { "Yes" } else { "No" }}</td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
            <div class="user-table__pager">
                <button
                    class="btn"
                    disabled=move || loading.get() || !has_previous()
                    on:click=move |_| page_number.update(|n| *n = n.saturating_sub(1).max(1))
                >
                    "Previous"
                </button>
                <span class="user-table__summary">
                    {move || {
                        if loading.get() {
                            "Loading...".to_owned()
                        } else {
                            page.with(|p| p.as_ref().map(page_summary).unwrap_or_default())
                        }
                    }}
                </span>
                <button
                    class="btn"
                    disabled=move || loading.get() || !has_next()
                    on:click=move |_| page_number.update(|n| *n += 1)
                >
                    "Next"
                </button>
            </div>
        </section>
    }
}
