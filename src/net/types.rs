//! Shared wire DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! The backend owns the user and content schemas, so records are kept
//! loosely typed: known fields are named, everything else rides along in
//! `extra` and survives serde round-trips.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The authenticated user as returned by `/users/login` and `/users/verify`.
///
/// Opaque to the session logic: only its presence matters for authorization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    /// Best human-readable label for the header bar.
    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Signed in")
    }
}

/// Login form payload posted to `/users/login`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// A content record (book, course, department, ...).
///
/// Ids arrive as numbers or strings depending on the controller; `id` keeps
/// the raw value and [`ResourceRecord::id_string`] normalizes it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceRecord {
    /// The record id as a path segment, if it has one.
    pub fn id_string(&self) -> Option<String> {
        id_text(&self.id)
    }

    /// Name shown in list views.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.title.clone())
            .or_else(|| self.id_string())
            .unwrap_or_else(|| "(untitled)".to_owned())
    }
}

/// A JSON id (number or non-empty string) as text.
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
