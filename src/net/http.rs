//! HTTP helpers for the JSON backend with cookies, timeouts and consistent
//! error handling.
//!
//! Client-side (`csr`): real requests via `gloo-net`, always sent with
//! `credentials: include` so the session cookie rides along.
//! Native builds (tests, tooling): [`ApiClient::send`] returns
//! [`ApiError::Unavailable`].
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Http` with a sanitized message, so a
//! misbehaving backend cannot dump an HTML error page into the UI.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Default request timeout (milliseconds) applied to every request.
#[cfg(feature = "csr")]
const DEFAULT_TIMEOUT_MS: u32 = 10_000;
/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// HTTP verbs used by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Status and body of a completed request, before interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body)
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    }

    /// Decodes the body when it holds JSON for `T`; write endpoints may answer
    /// with an empty or plain-text body.
    pub fn json_if_present<T: DeserializeOwned>(&self) -> Option<T> {
        if self.body.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.body).ok()
    }

    /// Converts a failed response into `ApiError::Http`.
    pub fn into_error(self) -> ApiError {
        ApiError::Http {
            status: self.status,
            message: error_message(&self.body),
        }
    }
}

/// Builds a URL from a base URL and a path, tolerating stray slashes.
pub fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_owned()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Extracts a user-facing message from an error body.
///
/// Prefers a JSON `message` field (the backend's error envelope) and falls
/// back to the trimmed, truncated body text.
pub fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        });
    sanitize_body(from_json.as_deref().unwrap_or(body))
}

/// Trims and truncates error text; empty bodies become a generic message.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_owned()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

/// Encodes a request body as JSON.
///
/// # Errors
///
/// Returns `ApiError::Serialization` if `body` cannot be encoded.
pub fn json_body<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))
}

/// Request sender bound to one backend base URL.
///
/// Built once from `AppConfig` and shared through context; cloning copies
/// only the base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Sends a request with cookies included.
    ///
    /// # Errors
    ///
    /// Returns a transport error (`Network`, `Timeout`, `Serialization`) when no
    /// response arrives. Any status code, including errors, is returned as
    /// `Ok(RawResponse)` for the caller to interpret.
    pub async fn send(&self, method: Method, path: &str, body: Option<String>) -> Result<RawResponse, ApiError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::Request;
            use web_sys::RequestCredentials;

            let url = build_url(&self.base_url, path);
            log::debug!("{method:?} {url}");
            let response = send_with_timeout(move |signal| {
                let builder = match method {
                    Method::Get => Request::get(&url),
                    Method::Post => Request::post(&url),
                    Method::Put => Request::put(&url),
                    Method::Delete => Request::delete(&url),
                }
                .credentials(RequestCredentials::Include)
                .abort_signal(Some(signal));

                match body {
                    Some(payload) => builder.header("Content-Type", "application/json").body(payload),
                    None => builder.build(),
                }
                .map_err(|err| ApiError::Serialization(format!("Failed to build request: {err}")))
            })
            .await?;

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Ok(RawResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&self.base_url, method, path, body);
            Err(ApiError::Unavailable)
        }
    }

    /// GETs `path` and decodes a 2xx JSON body.
    ///
    /// # Errors
    ///
    /// Returns transport errors, `ApiError::Http` for non-2xx, or `ApiError::Parse`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::Get, path, None).await?;
        if response.is_success() {
            response.json()
        } else {
            Err(response.into_error())
        }
    }

    /// POSTs or PUTs a JSON `body`, returning the decoded reply when there is one.
    ///
    /// # Errors
    ///
    /// Returns transport errors or `ApiError::Http` for non-2xx.
    pub async fn write_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: String,
    ) -> Result<Option<T>, ApiError> {
        let response = self.send(method, path, Some(body)).await?;
        if response.is_success() {
            Ok(response.json_if_present())
        } else {
            Err(response.into_error())
        }
    }

    /// DELETEs `path`, accepting 200 and 204. Some endpoints take the id in
    /// a JSON `body` instead of the path.
    ///
    /// # Errors
    ///
    /// Returns transport errors or `ApiError::Http` for any other status.
    pub async fn delete(&self, path: &str, body: Option<String>) -> Result<(), ApiError> {
        let response = self.send(Method::Delete, path, body).await?;
        if matches!(response.status, 200 | 204) {
            Ok(())
        } else {
            Err(response.into_error())
        }
    }
}

/// Maps network errors into `ApiError` variants with timeout detection.
#[cfg(feature = "csr")]
fn map_request_error(err: gloo_net::Error) -> ApiError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        ApiError::Timeout("Request timed out. Please try again.".to_owned())
    } else {
        ApiError::Network(format!("Unable to reach the server: {message}"))
    }
}

/// Sends a request with an abort timeout so a hung backend cannot pin UI state.
#[cfg(feature = "csr")]
async fn send_with_timeout(
    build_request: impl FnOnce(&web_sys::AbortSignal) -> Result<gloo_net::http::Request, ApiError>,
) -> Result<gloo_net::http::Response, ApiError> {
    use gloo_timers::callback::Timeout;
    use web_sys::AbortController;

    let controller = AbortController::new()
        .map_err(|_| ApiError::Network("Failed to initialize request timeout.".to_owned()))?;
    let signal = controller.signal();
    let timeout_controller = controller.clone();
    let _timeout = Timeout::new(DEFAULT_TIMEOUT_MS, move || timeout_controller.abort());

    let request = build_request(&signal)?;
    request.send().await.map_err(map_request_error)
}
