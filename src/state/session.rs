//! Auth-session state and the store that mutates it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The route guard consults this store on every navigation; pages call
//! `login`/`logout`. The store never navigates itself.
//!
//! CONCURRENCY
//! ===========
//! Single-threaded and cooperative. The state lock is only taken between
//! awaits, never across one. `is_verifying` de-duplicates verification: a
//! caller arriving while a verify is in flight gets the current (possibly
//! stale) status back instead of a second request, and can then await
//! [`SessionStore::settled`] for the outcome of the request already running.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::oneshot;
use thiserror::Error;

use crate::net::api::SessionApi;
use crate::net::error::ApiError;
use crate::net::types::{LoginCredentials, SessionUser};

/// Shown when the backend gives no usable reason for a failed login.
pub const DEFAULT_LOGIN_ERROR: &str = "Login failed";

/// Authentication state for the current tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub is_verifying: bool,
    pub is_initialized: bool,
    pub redirect_path: Option<String>,
    /// Last error message, for display only.
    pub error: Option<String>,
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated,
    Unauthenticated,
}

/// Outcome of [`SessionStore::verify_user`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verification {
    /// A verify request ran and the state reflects its result.
    Settled(SessionStatus),
    /// Another verify was already in flight; this is the status known at call time.
    Stale(SessionStatus),
}

impl Verification {
    pub fn status(self) -> SessionStatus {
        match self {
            Verification::Settled(status) | Verification::Stale(status) => status,
        }
    }

    pub fn is_stale(self) -> bool {
        matches!(self, Verification::Stale(_))
    }
}

/// Errors from session actions.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The login request never got a response.
    #[error("{0}")]
    Network(String),
    /// The backend rejected the credentials (any non-200).
    #[error("{0}")]
    LoginFailed(String),
    /// Verification did not return a user. Logged, never surfaced.
    #[error("session verification failed: {0}")]
    VerificationFailed(String),
}

impl AuthError {
    fn from_login(err: &ApiError) -> Self {
        match err {
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::Unavailable => {
                AuthError::Network(err.to_string())
            }
            _ => AuthError::LoginFailed(login_error_message(err)),
        }
    }
}

/// The message stored in `SessionState::error` after a failed login.
fn login_error_message(err: &ApiError) -> String {
    err.server_message().unwrap_or(DEFAULT_LOGIN_ERROR).to_owned()
}

type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;
type SettleWaiters = Arc<Mutex<Vec<oneshot::Sender<SessionStatus>>>>;

/// Owns the [`SessionState`] and the actions that change it.
///
/// Cloning is cheap and every clone shares the same state, so one store is
/// built at startup and handed out through context.
pub struct SessionStore<A> {
    api: Arc<A>,
    state: Arc<Mutex<SessionState>>,
    listener: Option<Listener>,
    /// Callers parked in [`SessionStore::settled`] until the running verify ends.
    waiters: SettleWaiters,
}

impl<A> Clone for SessionStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            listener: self.listener.clone(),
            waiters: Arc::clone(&self.waiters),
        }
    }
}

impl<A: SessionApi> SessionStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(Mutex::new(SessionState::default())),
            listener: None,
            waiters: Arc::default(),
        }
    }

    /// Registers a callback that receives a fresh snapshot after every mutation.
    #[must_use]
    pub fn with_listener(mut self, listener: impl Fn(&SessionState) + Send + Sync + 'static) -> Self {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `mutate` under the lock, then notifies the listener outside it.
    pub(crate) fn update<R>(&self, mutate: impl FnOnce(&mut SessionState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = mutate(&mut state);
            let snapshot = self.listener.as_ref().map(|_| state.clone());
            (result, snapshot)
        };
        if let (Some(listener), Some(snapshot)) = (&self.listener, snapshot) {
            listener(&snapshot);
        }
        result
    }

    /// Logs in with `credentials`.
    ///
    /// On success the user is stored and the session marked initialized.
    /// Navigation is left to the route guard.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LoginFailed` for any non-200 response and
    /// `AuthError::Network` when the request got no response. In both cases
    /// `error` holds the server message or [`DEFAULT_LOGIN_ERROR`].
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionUser, AuthError> {
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.api.login(credentials).await;

        self.update(|state| {
            state.loading = false;
            match result {
                Ok(user) => {
                    state.user = Some(user.clone());
                    state.is_initialized = true;
                    Ok(user)
                }
                Err(err) => {
                    log::warn!("login failed: {err}");
                    state.error = Some(login_error_message(&err));
                    Err(AuthError::from_login(&err))
                }
            }
        })
    }

    /// Checks the current session cookie against the backend.
    ///
    /// Any failure clears the user. If a verify is already in flight no
    /// request is made and the currently known status is returned as
    /// [`Verification::Stale`].
    pub async fn verify_user(&self) -> Verification {
        let in_flight = self.update(|state| {
            if state.is_verifying {
                Some(state.status())
            } else {
                state.is_verifying = true;
                state.loading = true;
                state.error = None;
                None
            }
        });
        if let Some(status) = in_flight {
            log::debug!("verify already in flight, reusing {status:?}");
            return Verification::Stale(status);
        }

        let result = self.api.verify().await;

        let status = self.update(|state| {
            match result {
                Ok(user) => state.user = Some(user),
                Err(err) => {
                    log::debug!("{}", AuthError::VerificationFailed(err.to_string()));
                    state.user = None;
                }
            }
            state.is_initialized = true;
            state.is_verifying = false;
            state.loading = false;
            state.status()
        });
        self.release_waiters(status);
        Verification::Settled(status)
    }

    /// Resolves once no verification is in flight, with the status it left.
    ///
    /// Returns immediately when nothing is verifying.
    pub async fn settled(&self) -> SessionStatus {
        let receiver = {
            let state = self.lock();
            if !state.is_verifying {
                return state.status();
            }
            let (sender, receiver) = oneshot::channel();
            self.waiters
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(sender);
            receiver
        };
        match receiver.await {
            Ok(status) => status,
            Err(oneshot::Canceled) => self.lock().status(),
        }
    }

    fn release_waiters(&self, status: SessionStatus) {
        let waiters = std::mem::take(&mut *self.waiters.lock().unwrap_or_else(PoisonError::into_inner));
        for waiter in waiters {
            let _ = waiter.send(status);
        }
    }

    /// Ends the session. Local state is cleared whatever the backend says.
    pub async fn logout(&self) {
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });

        if let Err(err) = self.api.logout().await {
            log::warn!("logout request failed, clearing session locally: {err}");
        }

        self.update(|state| {
            state.user = None;
            state.redirect_path = None;
            state.is_initialized = true;
            state.loading = false;
        });
    }

    pub fn set_redirect_path(&self, path: impl Into<String>) {
        let path = path.into();
        self.update(|state| state.redirect_path = Some(path));
    }

    pub fn clear_redirect_path(&self) {
        self.update(|state| state.redirect_path = None);
    }

    /// Reads and clears the redirect intent in one step.
    pub fn take_redirect_path(&self) -> Option<String> {
        self.update(|state| state.redirect_path.take())
    }

    /// Marks the session as checked without a network call.
    pub fn initialize(&self) {
        if self.lock().is_initialized {
            return;
        }
        self.update(|state| state.is_initialized = true);
    }
}
