//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::session_gate::{SessionContext, SessionGate};
use crate::components::snackbar_host::SnackbarHost;
use crate::config::AppConfig;
use crate::net::http::ApiClient;
use crate::pages::{
    dashboard::DashboardPage, login::LoginPage, not_found::NotFoundPage, resources::ResourcesPage,
};
use crate::state::snackbar::SnackbarState;

/// Root application component.
///
/// Provides config, the API client, the session context and the snackbar
/// queue, then routes every navigation through [`SessionGate`].
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::load();
    log::debug!("api base url: {}", config.api_base_url);
    let client = ApiClient::new(config.api_base_url.clone());
    let session = SessionContext::new(&config, client.clone());
    let snackbar = RwSignal::new(SnackbarState::default());

    provide_context(config);
    provide_context(client);
    provide_context(session);
    provide_context(snackbar);

    view! {
        <Title text="Al-Amal Admin"/>

        <Router>
            <SessionGate>
                <Routes fallback=|| view! { <NotFoundPage/> }>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("") view=DashboardPage/>
                    <Route path=StaticSegment("dashboard") view=DashboardPage/>
                    <Route path=(StaticSegment("dashboard"), ParamSegment("resource")) view=ResourcesPage/>
                </Routes>
            </SessionGate>
            <SnackbarHost/>
        </Router>
    }
}
