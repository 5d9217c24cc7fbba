//! Chrome shared by every authenticated page: brand, menu, user, sign-out.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::nav_menu::NavMenu;
use crate::components::session_gate::use_session;
use crate::components::snackbar_host::notify;
use crate::navigation::{HORIZONTAL_MENU, NavItem};
use crate::state::snackbar::{SnackbarKind, SnackbarState};

#[component]
pub fn AdminLayout(
    #[prop(default = HORIZONTAL_MENU)] menu: &'static [NavItem],
    children: Children,
) -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();
    let snackbar = expect_context::<RwSignal<SnackbarState>>();
    let state = session.state;
    let store = session.store.clone();
    let login_path = session.guard_config.login_path.clone();

    let user_label = move || {
        state.with(|s| {
            s.user
                .as_ref()
                .map(|user| user.display_name().to_owned())
                .unwrap_or_default()
        })
    };

    let on_logout = move |_| {
        let store = store.clone();
        let navigate = navigate.clone();
        let login_path = login_path.clone();
        spawn_local(async move {
            store.logout().await;
            notify(snackbar, "Signed out", SnackbarKind::Info);
            navigate(&login_path, NavigateOptions::default());
        });
    };

    view! {
        <div class="admin-layout">
            <header class="admin-layout__header">
                <span class="admin-layout__brand">"Al-Amal"</span>
                <NavMenu items=menu/>
                <span class="admin-layout__user">{user_label}</span>
                <button
                    class="btn"
                    on:click=on_logout
                    disabled=move || state.with(|s| s.loading)
                >
                    "Sign out"
                </button>
            </header>
            <main class="admin-layout__content">{children()}</main>
        </div>
    }
}
