//! Per-navigation route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route change runs through [`RouteGuard::evaluate`]: it verifies the
//! session when that can change the answer, classifies the target path and
//! either allows the navigation or names a redirect target. The redirect
//! intent (`redirect_path`) carries the first requested page across the
//! login round-trip, which spans two separate navigations.
//!
//! The decision itself is the pure [`plan`] function; `evaluate` only adds the
//! verification step and writes the intent change back to the store.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::net::api::SessionApi;
use crate::state::session::SessionStore;
use crate::util::session_hint::SessionHint;

/// Paths and options the guard works with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    pub login_path: String,
    pub root_path: String,
    /// Paths at or under this prefix are the protected admin section.
    pub protected_prefix: String,
    /// Where an authenticated user lands when no intent is stored.
    pub default_section: String,
    /// When set, a missing session hint marks the session checked without
    /// calling the verify endpoint.
    pub skip_verify_without_hint: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_owned(),
            root_path: "/".to_owned(),
            protected_prefix: "/dashboard".to_owned(),
            default_section: "/dashboard".to_owned(),
            skip_verify_without_hint: false,
        }
    }
}

/// How the guard treats a target path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    Login,
    Protected,
    Root,
    Other,
}

impl GuardConfig {
    pub fn classify(&self, path: &str) -> RouteKind {
        let path = normalize_path(path);
        if path == normalize_path(&self.login_path) {
            RouteKind::Login
        } else if path == normalize_path(&self.root_path) {
            RouteKind::Root
        } else if is_under(path, normalize_path(&self.protected_prefix)) {
            RouteKind::Protected
        } else {
            RouteKind::Other
        }
    }
}

/// Strips query, fragment and trailing slashes; the empty path becomes `/`.
fn normalize_path(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Result of a guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// What a decision does to the stored redirect intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentChange {
    Keep,
    Set(String),
    Clear,
}

/// Decides a navigation to `path` for a session in the given state.
///
/// Unauthenticated sessions only ever reach the login page; authenticated
/// sessions are only ever bounced off the login page and the root.
pub fn plan(
    config: &GuardConfig,
    path: &str,
    authenticated: bool,
    redirect_path: Option<&str>,
) -> (GuardDecision, IntentChange) {
    match (config.classify(path), authenticated) {
        (RouteKind::Login | RouteKind::Root, true) => (
            GuardDecision::Redirect(post_login_target(config, redirect_path)),
            IntentChange::Clear,
        ),
        (RouteKind::Login, false) => (GuardDecision::Allow, IntentChange::Keep),
        (RouteKind::Protected | RouteKind::Other, true) => (GuardDecision::Allow, IntentChange::Keep),
        (RouteKind::Root, false) => (
            GuardDecision::Redirect(config.login_path.clone()),
            IntentChange::Set(config.default_section.clone()),
        ),
        (RouteKind::Protected | RouteKind::Other, false) => (
            GuardDecision::Redirect(config.login_path.clone()),
            IntentChange::Set(path.to_owned()),
        ),
    }
}

/// The stored intent, unless it would bounce straight back to login or root.
fn post_login_target(config: &GuardConfig, redirect_path: Option<&str>) -> String {
    redirect_path
        .filter(|target| {
            !matches!(config.classify(target), RouteKind::Login | RouteKind::Root)
        })
        .unwrap_or(config.default_section.as_str())
        .to_owned()
}

/// Session-aware guard bound to one store and one session hint.
pub struct RouteGuard<A, H> {
    store: SessionStore<A>,
    hint: H,
    config: GuardConfig,
}

impl<A: SessionApi, H: SessionHint> RouteGuard<A, H> {
    pub fn new(store: SessionStore<A>, hint: H, config: GuardConfig) -> Self {
        Self { store, hint, config }
    }

    /// Evaluates a navigation from `from` to `to`.
    ///
    /// Suspends while a verification round-trip runs, including one started
    /// by another caller. A failed verification counts as unauthenticated.
    pub async fn evaluate(&self, to: &str, from: Option<&str>) -> GuardDecision {
        self.ensure_checked().await;

        let state = self.store.snapshot();
        let (decision, change) = plan(
            &self.config,
            to,
            state.is_authenticated(),
            state.redirect_path.as_deref(),
        );

        let decision = match change {
            IntentChange::Keep => decision,
            IntentChange::Set(path) => {
                self.store.set_redirect_path(path);
                decision
            }
            IntentChange::Clear => {
                let intent = self.store.take_redirect_path();
                GuardDecision::Redirect(post_login_target(&self.config, intent.as_deref()))
            }
        };

        if let GuardDecision::Redirect(target) = &decision {
            log::debug!(
                "guard: {} -> {to} redirected to {target}",
                from.unwrap_or("(start)")
            );
        }
        decision
    }

    /// Verifies the session when no user is loaded and either nothing has
    /// been checked yet or the hint suggests a session exists.
    async fn ensure_checked(&self) {
        let state = self.store.snapshot();
        if state.is_authenticated() {
            return;
        }

        let hinted = self.hint.has_possible_session();
        if !hinted && state.is_initialized {
            return;
        }
        if !hinted && self.config.skip_verify_without_hint {
            self.store.initialize();
            return;
        }

        let outcome = self.store.verify_user().await;
        let status = if outcome.is_stale() {
            log::debug!("guard: verification already running, waiting for it");
            self.store.settled().await
        } else {
            outcome.status()
        };
        log::debug!("guard: session checked, {status:?}");
    }
}

/// Orders guard evaluations so only the latest navigation applies its result.
///
/// Evaluations suspend on the network, so an older one can finish after a
/// newer one has started.
#[derive(Clone, Debug, Default)]
pub struct NavigationEpoch(Arc<AtomicU64>);

impl NavigationEpoch {
    /// Starts a new evaluation, superseding every earlier ticket.
    pub fn begin(&self) -> NavigationTicket {
        let value = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        NavigationTicket {
            epoch: Arc::clone(&self.0),
            value,
        }
    }

    /// Supersedes outstanding tickets without starting an evaluation.
    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct NavigationTicket {
    epoch: Arc<AtomicU64>,
    value: u64,
}

impl NavigationTicket {
    pub fn is_current(&self) -> bool {
        self.epoch.load(Ordering::SeqCst) == self.value
    }
}
