//! Typed backend calls built on the `http` helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`SessionApi`] is the seam between the session store and the network: the
//! browser build uses [`HttpSessionApi`], tests substitute in-memory fakes.
//! Content calls are plain functions keyed by [`ResourceKind`].

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use super::error::ApiError;
use super::http::{self, ApiClient, Method, RawResponse};
use super::types::{LoginCredentials, ResourceRecord, SessionUser};
use crate::state::resources::{ResourceKind, TranslationInput, course_groups_endpoint};

pub const LOGIN_ENDPOINT: &str = "/users/login";
pub const VERIFY_ENDPOINT: &str = "/users/verify";
pub const LOGOUT_ENDPOINT: &str = "/users/logout";

/// Session endpoints consumed by the session store.
///
/// Every call must carry the session cookie. Success is status 200 exactly;
/// anything else is reported as an error for the store to interpret.
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    /// `POST /users/login` with the credentials as JSON.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionUser, ApiError>;
    /// `GET /users/verify`.
    async fn verify(&self) -> Result<SessionUser, ApiError>;
    /// `POST /users/logout`.
    async fn logout(&self) -> Result<(), ApiError>;
}

/// [`SessionApi`] over the browser fetch transport.
#[derive(Clone, Debug)]
pub struct HttpSessionApi {
    client: ApiClient,
}

impl HttpSessionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl SessionApi for HttpSessionApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionUser, ApiError> {
        let body = http::json_body(credentials)?;
        let response = self.client.send(Method::Post, LOGIN_ENDPOINT, Some(body)).await?;
        user_from_response(response)
    }

    async fn verify(&self) -> Result<SessionUser, ApiError> {
        let response = self.client.send(Method::Get, VERIFY_ENDPOINT, None).await?;
        user_from_response(response)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .send(Method::Post, LOGOUT_ENDPOINT, Some(String::new()))
            .await?;
        if response.status == 200 {
            Ok(())
        } else {
            Err(response.into_error())
        }
    }
}

/// Accepts only status 200 with a decodable user body.
fn user_from_response(response: RawResponse) -> Result<SessionUser, ApiError> {
    if response.status == 200 {
        response.json()
    } else {
        Err(response.into_error())
    }
}

fn unsupported(kind: ResourceKind, operation: &str) -> ApiError {
    ApiError::Unsupported(format!("{} cannot be {operation}", kind.title()))
}

/// Fetch every record of `kind`.
///
/// # Errors
///
/// Returns `ApiError::Unsupported` when `kind` has no list endpoint, or the
/// transport/HTTP error from the request.
pub async fn fetch_resources(client: &ApiClient, kind: ResourceKind) -> Result<Vec<ResourceRecord>, ApiError> {
    let endpoint = kind.list_endpoint().ok_or_else(|| unsupported(kind, "listed"))?;
    client.get_json(endpoint).await
}

/// Fetch one record of `kind` by id.
///
/// # Errors
///
/// Returns `ApiError::Unsupported` when `kind` has no detail endpoint, or the
/// transport/HTTP error from the request.
pub async fn fetch_resource(client: &ApiClient, kind: ResourceKind, id: &str) -> Result<ResourceRecord, ApiError> {
    let endpoint = kind.detail_endpoint(id).ok_or_else(|| unsupported(kind, "fetched"))?;
    client.get_json(&endpoint).await
}

/// Delete one record of `kind` by id.
///
/// # Errors
///
/// Returns `ApiError::Unsupported` when `kind` has no delete endpoint, or the
/// transport/HTTP error from the request.
pub async fn delete_resource(client: &ApiClient, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
    let request = kind.delete_request(id).ok_or_else(|| unsupported(kind, "deleted"))?;
    let body = request.body.as_ref().map(http::json_body).transpose()?;
    client.delete(&request.path, body).await
}

/// Create a record of `kind` from a JSON payload.
///
/// Returns the created record when the backend echoes it.
///
/// # Errors
///
/// Returns `ApiError::Unsupported` when `kind` has no JSON create endpoint, or
/// the transport/HTTP error from the request.
pub async fn create_resource(
    client: &ApiClient,
    kind: ResourceKind,
    payload: &Value,
) -> Result<Option<ResourceRecord>, ApiError> {
    let endpoint = kind.create_endpoint().ok_or_else(|| unsupported(kind, "created"))?;
    client.write_json(Method::Post, endpoint, http::json_body(payload)?).await
}

/// Update record `id` of `kind` from a JSON payload.
///
/// # Errors
///
/// Returns `ApiError::Unsupported` when `kind` has no JSON update endpoint, or
/// the transport/HTTP error from the request.
pub async fn update_resource(
    client: &ApiClient,
    kind: ResourceKind,
    id: &str,
    payload: &Value,
) -> Result<Option<ResourceRecord>, ApiError> {
    let endpoint = kind.update_endpoint(id).ok_or_else(|| unsupported(kind, "edited"))?;
    client.write_json(Method::Put, &endpoint, http::json_body(payload)?).await
}

/// Add or edit one translation of `record`.
///
/// # Errors
///
/// Returns `ApiError::Unsupported` when `kind` has no translations or the
/// record has no id, or the transport/HTTP error from the request.
pub async fn submit_translation(
    client: &ApiClient,
    kind: ResourceKind,
    record: &ResourceRecord,
    input: &TranslationInput,
) -> Result<(), ApiError> {
    let request = kind
        .translation_request(record, input)
        .ok_or_else(|| unsupported(kind, "translated"))?;
    client
        .write_json::<Value>(request.method, &request.path, http::json_body(&request.body)?)
        .await
        .map(|_| ())
}

/// Fetch the groups belonging to a course.
///
/// # Errors
///
/// Returns the transport/HTTP error from the request.
pub async fn fetch_course_groups(client: &ApiClient, course_id: &str) -> Result<Vec<ResourceRecord>, ApiError> {
    client.get_json(&course_groups_endpoint(course_id)).await
}
