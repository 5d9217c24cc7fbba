//! Menu bar built from a `navigation` menu definition.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

use crate::navigation::{NavItem, active_item};

#[component]
pub fn NavMenu(items: &'static [NavItem]) -> impl IntoView {
    let location = use_location();

    view! {
        <nav class="nav-menu">
            {items
                .iter()
                .map(|item| {
                    let to = item.to;
                    let is_active = move || {
                        active_item(items, &location.pathname.get()).is_some_and(|a| a.to == to)
                    };
                    view! {
                        <a
                            href=to
                            class=move || {
                                if is_active() {
                                    "nav-menu__link nav-menu__link--active"
                                } else {
                                    "nav-menu__link"
                                }
                            }
                        >
                            <i class=format!("nav-menu__icon {}", item.icon)></i>
                            <span>{item.title}</span>
                        </a>
                    }
                })
                .collect_view()}
        </nav>
    }
}
