//! Session context and the gate that runs the route guard on navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds one [`SessionContext`]; [`SessionGate`] sits inside the
//! router, re-evaluates the guard whenever the path changes or a session
//! appears, and only renders routes the guard allowed. Each evaluation holds
//! a [`NavigationTicket`]; a result that lands after a newer navigation began
//! is dropped.

#[cfg(test)]
#[path = "session_gate_test.rs"]
mod session_gate_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::config::AppConfig;
use crate::net::api::HttpSessionApi;
use crate::net::http::ApiClient;
use crate::state::session::{SessionState, SessionStore};
use crate::util::guard::{GuardConfig, GuardDecision, NavigationEpoch, RouteGuard};
use crate::util::session_hint::CookieSessionHint;

pub type AppSessionStore = SessionStore<HttpSessionApi>;

/// Session handles shared through Leptos context.
#[derive(Clone)]
pub struct SessionContext {
    pub store: AppSessionStore,
    /// Reactive mirror of the store, refreshed after every store mutation.
    pub state: RwSignal<SessionState>,
    pub hint: CookieSessionHint,
    pub guard_config: GuardConfig,
}

impl SessionContext {
    pub fn new(config: &AppConfig, client: ApiClient) -> Self {
        let state = RwSignal::new(SessionState::default());
        let store = SessionStore::new(HttpSessionApi::new(client)).with_listener(move |snapshot| {
            let _ = state.try_set(snapshot.clone());
        });
        Self {
            store,
            state,
            hint: CookieSessionHint::new(config.session_cookie.clone()),
            guard_config: GuardConfig::default(),
        }
    }

    pub fn guard(&self) -> RouteGuard<HttpSessionApi, CookieSessionHint> {
        RouteGuard::new(self.store.clone(), self.hint.clone(), self.guard_config.clone())
    }
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

/// What the gate does after the path or the session changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateStep {
    /// The session was lost in place: hide the page and drop pending results.
    Hold,
    /// Run the guard for the current path.
    Evaluate { from: Option<String> },
}

/// Decides the gate's reaction given the previous `(path, authenticated)`.
pub fn gate_step(prev: Option<&(String, bool)>, path: &str, authenticated: bool) -> GateStep {
    match prev {
        Some((prev_path, true)) if prev_path == path && !authenticated => GateStep::Hold,
        Some((prev_path, _)) => GateStep::Evaluate {
            from: Some(prev_path.clone()),
        },
        None => GateStep::Evaluate { from: None },
    }
}

/// Runs the route guard before rendering `children`.
///
/// Re-runs on every path change, and when a session appears on the same path
/// (a login on `/login`). A session disappearing in place hides the page
/// without running the guard, so logout does not record the current page as
/// an intent; whoever logged out navigates to the login page.
#[component]
pub fn SessionGate(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let location = use_location();
    let navigate = use_navigate();
    let allowed = RwSignal::new(false);
    let state = session.state;
    let authenticated = Memo::new(move |_| state.with(SessionState::is_authenticated));

    let epoch = NavigationEpoch::default();

    Effect::new(move |prev: Option<(String, bool)>| {
        let path = location.pathname.get();
        let auth = authenticated.get();

        let from = match gate_step(prev.as_ref(), &path, auth) {
            GateStep::Hold => {
                epoch.invalidate();
                allowed.set(false);
                return (path, auth);
            }
            GateStep::Evaluate { from } => from,
        };

        let ticket = epoch.begin();
        let guard = session.guard();
        let navigate = navigate.clone();
        let target_path = path.clone();
        spawn_local(async move {
            let decision = guard.evaluate(&target_path, from.as_deref()).await;
            if !ticket.is_current() {
                log::debug!("gate: dropping result for {target_path}");
                return;
            }
            match decision {
                GuardDecision::Allow => {
                    let _ = allowed.try_set(true);
                }
                GuardDecision::Redirect(target) => {
                    let _ = allowed.try_set(false);
                    navigate(
                        &target,
                        NavigateOptions {
                            replace: true,
                            ..NavigateOptions::default()
                        },
                    );
                }
            }
        });

        (path, auth)
    });

    view! {
        <Show
            when=move || allowed.get()
            fallback=|| view! { <div class="session-gate__pending">"Checking session..."</div> }
        >
            {children()}
        </Show>
    }
}
