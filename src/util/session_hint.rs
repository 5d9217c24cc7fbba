//! Cheap "might there be a session?" check consulted before verifying.
//!
//! The guard never reads the cookie value; it only asks whether verifying is
//! worth a round-trip. Session cookies marked `HttpOnly` are invisible to
//! `document.cookie`, so a `false` here is a hint, not proof.

#[cfg(test)]
#[path = "session_hint_test.rs"]
mod session_hint_test;

/// Capability queried by the route guard.
pub trait SessionHint {
    fn has_possible_session(&self) -> bool;
}

impl<F: Fn() -> bool> SessionHint for F {
    fn has_possible_session(&self) -> bool {
        self()
    }
}

/// Looks for a named cookie in `document.cookie`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieSessionHint {
    cookie_name: String,
}

impl CookieSessionHint {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

impl SessionHint for CookieSessionHint {
    fn has_possible_session(&self) -> bool {
        #[cfg(feature = "csr")]
        {
            use wasm_bindgen::JsCast;

            web_sys::window()
                .and_then(|w| w.document())
                .and_then(|doc| doc.dyn_into::<web_sys::HtmlDocument>().ok())
                .and_then(|doc| doc.cookie().ok())
                .is_some_and(|cookies| cookie_present(&cookies, &self.cookie_name))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = &self.cookie_name;
            false
        }
    }
}

/// Whether `name` appears with a non-empty value in a `Cookie`-style string.
pub fn cookie_present(cookies: &str, name: &str) -> bool {
    cookies
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key.trim() == name && !value.trim().is_empty())
}
