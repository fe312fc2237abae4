//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{ParentRoute, Redirect, Route, Router, Routes};
use leptos_router::StaticSegment;

use crate::pages::admin::AdminLayout;
use crate::pages::admin::dashboard::DashboardPage;
use crate::pages::admin::profile::ProfilePage;
use crate::pages::admin::setting::SettingPage;
use crate::pages::auth::{AuthPage, SIGNIN_PATH};
use crate::pages::home::HomePage;
use crate::state::auth::provide_session;

/// Root application component.
///
/// Restores the persisted session, provides it as context, kicks off
/// startup hydration and the refresh loop, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = provide_session();

    #[cfg(feature = "csr")]
    {
        leptos::task::spawn_local(crate::state::auth::bootstrap(session));
        crate::state::auth::start_refresh_loop(session);
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = session;
    }

    view! {
        <Title text="HotelSocial"/>

        <Router>
            <Routes fallback=|| view! { <Redirect path="/"/> }>
                <Route path=(StaticSegment("auth"), StaticSegment("signin")) view=AuthPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("signup")) view=AuthPage/>
                <Route path=StaticSegment("auth") view=|| view! { <Redirect path=SIGNIN_PATH/> }/>
                <ParentRoute path=StaticSegment("admin") view=AdminLayout>
                    <Route path=StaticSegment("dashboard") view=DashboardPage/>
                    <Route path=StaticSegment("setting") view=SettingPage/>
                    <Route path=StaticSegment("profile") view=ProfilePage/>
                    <Route path=StaticSegment("") view=|| view! { <Redirect path="/admin/dashboard"/> }/>
                </ParentRoute>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
