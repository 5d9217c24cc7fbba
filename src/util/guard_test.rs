use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use futures::executor::block_on;

use super::*;
use crate::net::error::ApiError;
use crate::state::session::{SessionStatus, Verification};
use crate::net::types::{LoginCredentials, SessionUser};

/// Returns `Pending` once (waking itself) so joined futures interleave.
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

struct FakeApi {
    accept: bool,
    verify_calls: Arc<AtomicUsize>,
}

impl FakeApi {
    fn accepting() -> Self {
        Self {
            accept: true,
            verify_calls: Arc::default(),
        }
    }

    fn rejecting() -> Self {
        Self {
            accept: false,
            verify_calls: Arc::default(),
        }
    }

    fn result(&self) -> Result<SessionUser, ApiError> {
        if self.accept {
            Ok(SessionUser {
                id: Some("u-1".to_owned()),
                ..SessionUser::default()
            })
        } else {
            Err(ApiError::Http {
                status: 401,
                message: "Unauthorized".to_owned(),
            })
        }
    }
}

impl SessionApi for FakeApi {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<SessionUser, ApiError> {
        self.result()
    }

    async fn verify(&self) -> Result<SessionUser, ApiError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        YieldNow(false).await;
        self.result()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn no_session() -> bool {
    false
}

fn maybe_session() -> bool {
    true
}

type TestGuard = RouteGuard<FakeApi, fn() -> bool>;

/// Builds a guard and returns the fake's verify counter alongside it.
fn guard(api: FakeApi, hint: fn() -> bool) -> (TestGuard, Arc<AtomicUsize>) {
    let calls = Arc::clone(&api.verify_calls);
    (RouteGuard::new(SessionStore::new(api), hint, GuardConfig::default()), calls)
}

fn count(calls: &AtomicUsize) -> usize {
    calls.load(Ordering::SeqCst)
}

fn redirect(to: &str) -> GuardDecision {
    GuardDecision::Redirect(to.to_owned())
}

// =============================================================
// classify
// =============================================================

#[test]
fn classify_recognizes_each_route_kind() {
    let config = GuardConfig::default();
    assert_eq!(config.classify("/login"), RouteKind::Login);
    assert_eq!(config.classify("/login/"), RouteKind::Login);
    assert_eq!(config.classify("/"), RouteKind::Root);
    assert_eq!(config.classify(""), RouteKind::Root);
    assert_eq!(config.classify("/dashboard"), RouteKind::Protected);
    assert_eq!(config.classify("/dashboard/books"), RouteKind::Protected);
    assert_eq!(config.classify("/dashboard/books?page=2"), RouteKind::Protected);
    assert_eq!(config.classify("/dashboards"), RouteKind::Other);
    assert_eq!(config.classify("/profile"), RouteKind::Other);
}

// =============================================================
// plan
// =============================================================

#[test]
fn login_while_authenticated_goes_to_stored_intent() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/login", true, Some("/dashboard/books")),
        (redirect("/dashboard/books"), IntentChange::Clear)
    );
}

#[test]
fn login_while_authenticated_without_intent_goes_to_default_section() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/login", true, None),
        (redirect("/dashboard"), IntentChange::Clear)
    );
}

#[test]
fn login_intent_pointing_at_login_falls_back_to_default() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/login", true, Some("/login")),
        (redirect("/dashboard"), IntentChange::Clear)
    );
}

#[test]
fn login_while_unauthenticated_is_allowed() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/login", false, Some("/dashboard/books")),
        (GuardDecision::Allow, IntentChange::Keep)
    );
}

#[test]
fn protected_path_requires_session() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/dashboard/courses", false, None),
        (redirect("/login"), IntentChange::Set("/dashboard/courses".to_owned()))
    );
    assert_eq!(
        plan(&config, "/dashboard/courses", true, None),
        (GuardDecision::Allow, IntentChange::Keep)
    );
}

#[test]
fn root_sends_unauthenticated_users_to_login_with_default_intent() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/", false, None),
        (redirect("/login"), IntentChange::Set("/dashboard".to_owned()))
    );
}

#[test]
fn root_sends_authenticated_users_to_intent_or_default() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/", true, Some("/dashboard/units")),
        (redirect("/dashboard/units"), IntentChange::Clear)
    );
    assert_eq!(
        plan(&config, "/", true, None),
        (redirect("/dashboard"), IntentChange::Clear)
    );
}

#[test]
fn other_paths_follow_session() {
    let config = GuardConfig::default();
    assert_eq!(
        plan(&config, "/profile", false, None),
        (redirect("/login"), IntentChange::Set("/profile".to_owned()))
    );
    assert_eq!(
        plan(&config, "/profile", true, Some("/dashboard")),
        (GuardDecision::Allow, IntentChange::Keep)
    );
}

#[test]
fn unauthenticated_never_allowed_off_login() {
    let config = GuardConfig::default();
    for path in ["/", "/dashboard", "/dashboard/books", "/profile", "/x/y"] {
        let (decision, _) = plan(&config, path, false, None);
        assert_eq!(decision, redirect("/login"), "{path}");
    }
}

// =============================================================
// evaluate
// =============================================================

#[test]
fn first_navigation_verifies_even_without_hint() {
    let (guard, calls) = guard(FakeApi::accepting(), no_session);

    let decision = block_on(guard.evaluate("/dashboard/books", None));

    assert_eq!(decision, GuardDecision::Allow);
    assert_eq!(count(&calls), 1);
}

#[test]
fn checked_session_without_hint_skips_verify() {
    let (guard, calls) = guard(FakeApi::rejecting(), no_session);
    block_on(guard.evaluate("/dashboard", None));
    block_on(guard.evaluate("/login", Some("/dashboard")));
    block_on(guard.evaluate("/dashboard/books", Some("/login")));

    assert_eq!(count(&calls), 1);
}

#[test]
fn hint_triggers_reverification_when_no_user() {
    let (guard, calls) = guard(FakeApi::rejecting(), maybe_session);
    block_on(guard.evaluate("/dashboard", None));
    block_on(guard.evaluate("/dashboard", Some("/login")));

    assert_eq!(count(&calls), 2);
}

#[test]
fn loaded_user_is_not_reverified() {
    let (guard, calls) = guard(FakeApi::accepting(), maybe_session);
    block_on(guard.evaluate("/dashboard", None));
    block_on(guard.evaluate("/dashboard/books", Some("/dashboard")));

    assert_eq!(count(&calls), 1);
}

#[test]
fn skip_verify_without_hint_initializes_locally() {
    let config = GuardConfig {
        skip_verify_without_hint: true,
        ..GuardConfig::default()
    };
    let api = FakeApi::accepting();
    let calls = Arc::clone(&api.verify_calls);
    let guard = RouteGuard::new(SessionStore::new(api), no_session, config);

    let decision = block_on(guard.evaluate("/dashboard/books", None));

    assert_eq!(decision, redirect("/login"));
    assert_eq!(count(&calls), 0);
    assert!(guard.store.snapshot().is_initialized);
}

#[test]
fn failed_verification_fails_closed() {
    let (guard, _) = guard(FakeApi::rejecting(), maybe_session);

    let decision = block_on(guard.evaluate("/dashboard/courses", None));

    assert_eq!(decision, redirect("/login"));
    assert_eq!(
        guard.store.snapshot().redirect_path.as_deref(),
        Some("/dashboard/courses")
    );
}

#[test]
fn navigation_during_running_verify_waits_for_its_result() {
    let (guard, calls) = guard(FakeApi::accepting(), maybe_session);
    let store = guard.store.clone();

    let (outcome, decision) = block_on(async {
        futures::join!(store.verify_user(), guard.evaluate("/dashboard/books", None))
    });

    assert_eq!(outcome, Verification::Settled(SessionStatus::Authenticated));
    assert_eq!(decision, GuardDecision::Allow);
    assert!(guard.store.snapshot().redirect_path.is_none());
    assert_eq!(count(&calls), 1);
}

#[test]
fn navigation_during_failing_verify_redirects_after_it_settles() {
    let (guard, calls) = guard(FakeApi::rejecting(), maybe_session);
    let store = guard.store.clone();

    let (_, decision) = block_on(async {
        futures::join!(store.verify_user(), guard.evaluate("/dashboard/units", None))
    });

    assert_eq!(decision, redirect("/login"));
    assert_eq!(
        guard.store.snapshot().redirect_path.as_deref(),
        Some("/dashboard/units")
    );
    assert_eq!(count(&calls), 1);
}

#[test]
fn login_redirect_consumes_intent_once() {
    let (guard, _) = guard(FakeApi::accepting(), no_session);
    block_on(guard.store.login(&LoginCredentials::default())).expect("login");
    guard.store.set_redirect_path("/dashboard/departments");

    assert_eq!(
        block_on(guard.evaluate("/login", None)),
        redirect("/dashboard/departments")
    );
    assert!(guard.store.snapshot().redirect_path.is_none());
    assert_eq!(block_on(guard.evaluate("/login", None)), redirect("/dashboard"));
}

// =============================================================
// NavigationEpoch
// =============================================================

#[test]
fn newer_navigation_supersedes_older_ticket() {
    let epoch = NavigationEpoch::default();
    let first = epoch.begin();
    assert!(first.is_current());

    let second = epoch.begin();
    assert!(!first.is_current());
    assert!(second.is_current());
}

#[test]
fn invalidate_supersedes_without_new_ticket() {
    let epoch = NavigationEpoch::default();
    let ticket = epoch.clone().begin();
    epoch.invalidate();
    assert!(!ticket.is_current());
}

#[test]
fn login_round_trip_returns_to_requested_page() {
    let (guard, _) = guard(FakeApi::accepting(), no_session);
    guard.store.initialize();

    assert_eq!(
        block_on(guard.evaluate("/dashboard/books", None)),
        redirect("/login")
    );
    assert_eq!(
        guard.store.snapshot().redirect_path.as_deref(),
        Some("/dashboard/books")
    );
    assert_eq!(
        block_on(guard.evaluate("/login", Some("/dashboard/books"))),
        GuardDecision::Allow
    );

    block_on(guard.store.login(&LoginCredentials::default())).expect("login");

    assert_eq!(
        block_on(guard.evaluate("/login", Some("/login"))),
        redirect("/dashboard/books")
    );
    assert!(guard.store.snapshot().redirect_path.is_none());
    assert_eq!(
        block_on(guard.evaluate("/dashboard/books", Some("/login"))),
        GuardDecision::Allow
    );
}

#[test]
fn logout_then_root_sets_default_intent() {
    let (guard, _) = guard(FakeApi::accepting(), no_session);
    block_on(guard.evaluate("/dashboard", None));
    block_on(guard.store.logout());

    assert_eq!(block_on(guard.evaluate("/", Some("/dashboard"))), redirect("/login"));
    assert_eq!(guard.store.snapshot().redirect_path.as_deref(), Some("/dashboard"));
}
