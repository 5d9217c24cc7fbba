//! Snackbar rendering and the `notify` helper pages use to raise messages.

use leptos::prelude::*;

use crate::state::snackbar::{DEFAULT_DURATION_MS, SnackbarKind, SnackbarState};

/// Queue a message and start its hide timer if it became visible.
pub fn notify(snackbar: RwSignal<SnackbarState>, message: impl Into<String>, kind: SnackbarKind) {
    let message = message.into();
    let shown = snackbar
        .try_update(|state| state.show(message, kind, DEFAULT_DURATION_MS))
        .flatten();
    if let Some(duration_ms) = shown {
        schedule_hide(snackbar, duration_ms);
    }
}

fn schedule_hide(snackbar: RwSignal<SnackbarState>, duration_ms: u32) {
    #[cfg(feature = "csr")]
    gloo_timers::callback::Timeout::new(duration_ms, move || {
        if let Some(next) = snackbar.try_update(SnackbarState::hide).flatten() {
            schedule_hide(snackbar, next);
        }
    })
    .forget();
    #[cfg(not(feature = "csr"))]
    let _ = (snackbar, duration_ms);
}

/// Renders the visible snackbar message, if any.
#[component]
pub fn SnackbarHost() -> impl IntoView {
    let snackbar = expect_context::<RwSignal<SnackbarState>>();

    view! {
        <Show when=move || snackbar.with(|state| state.visible)>
            {move || {
                snackbar
                    .with(|state| state.current.clone())
                    .map(|current| {
                        view! {
                            <div class=format!("snackbar {}", current.kind.class()) role="status">
                                {current.message}
                            </div>
                        }
                    })
            }}
        </Show>
    }
}
