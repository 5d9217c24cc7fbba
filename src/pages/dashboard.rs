//! Dashboard landing page with a card per content section.

use leptos::prelude::*;

use crate::components::admin_layout::AdminLayout;
use crate::components::session_gate::use_session;
use crate::navigation::VERTICAL_MENU;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = use_session().state;
    let greeting = move || {
        state.with(|s| {
            s.user
                .as_ref()
                .map_or_else(|| "Welcome".to_owned(), |user| format!("Welcome, {}", user.display_name()))
        })
    };

    view! {
        <AdminLayout>
            <section class="dashboard">
                <h1>{greeting}</h1>
                <div class="dashboard__grid">
                    {VERTICAL_MENU
                        .iter()
                        .filter(|item| item.to != "/")
                        .map(|item| {
                            view! {
                                <a class="dashboard-card" href=item.to>
                                    <i class=format!("dashboard-card__icon {}", item.icon)></i>
                                    <span class="dashboard-card__title">{item.title}</span>
                                </a>
                            }
                        })
                        .collect_view()}
                </div>
            </section>
        </AdminLayout>
    }
}
