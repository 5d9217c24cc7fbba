//! Login page posting email + password credentials.
//!
//! SYSTEM CONTEXT
//! ==============
//! A successful login updates the session store; the session gate sees the
//! new session on `/login` and redirects to the remembered destination.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::session_gate::use_session;
use crate::components::snackbar_host::notify;
use crate::net::types::LoginCredentials;
use crate::state::session::AuthError;
use crate::state::snackbar::{SnackbarKind, SnackbarState};

const MISSING_FIELDS: &str = "Enter both email and password.";

fn validate_login_input(email: &str, password: &str, remember_me: bool) -> Result<LoginCredentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.trim().is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok(LoginCredentials {
        email: email.to_owned(),
        password: password.to_owned(),
        remember_me,
    })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let snackbar = expect_context::<RwSignal<SnackbarState>>();
    let state = session.state;
    let store = session.store.clone();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let remember_me = RwSignal::new(false);
    let info = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if state.with_untracked(|s| s.loading) {
            return;
        }
        let credentials = match validate_login_input(
            &email.get_untracked(),
            &password.get_untracked(),
            remember_me.get_untracked(),
        ) {
            Ok(credentials) => credentials,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        info.set(String::new());

        let store = store.clone();
        spawn_local(async move {
            match store.login(&credentials).await {
                Ok(user) => {
                    let _ = password.try_set(String::new());
                    notify(snackbar, format!("Welcome, {}", user.display_name()), SnackbarKind::Success);
                }
                Err(err @ AuthError::Network(_)) => notify(snackbar, err.to_string(), SnackbarKind::Error),
                Err(_) => {}
            }
        });
    };

    let message = move || {
        let local = info.get();
        if local.is_empty() {
            state.with(|s| s.error.clone()).unwrap_or_default()
        } else {
            local
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Al-Amal"</h1>
                <p class="login-card__subtitle">"Administration"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        autocomplete="username"
                        placeholder="admin@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <label class="login-remember">
                        <input
                            type="checkbox"
                            prop:checked=move || remember_me.get()
                            on:change=move |ev| remember_me.set(event_target_checked(&ev))
                        />
                        "Remember me"
                    </label>
                    <button
                        class="login-button"
                        type="submit"
                        disabled=move || state.with(|s| s.loading)
                    >
                        {move || if state.with(|s| s.loading) { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || !message().is_empty()>
                    <p class="login-message">{message}</p>
                </Show>
            </div>
        </div>
    }
}
