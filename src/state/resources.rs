//! Content resources (books, courses, ...) and their list/selection state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every content store follows the same shape: hold a list and a selection,
//! call an endpoint, update local state, surface a message. [`ResourceKind`]
//! names the endpoints; [`ResourceState`] holds the shared transitions that
//! pages drive around `net::api` calls.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use serde_json::{Map, Value, json};

use crate::net::error::ApiError;
use crate::net::http::Method;
use crate::net::types::{ResourceRecord, id_text};

/// Content kinds managed by the admin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Books,
    Courses,
    Departments,
    Categories,
    Groups,
    Lessons,
    Units,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Books,
        ResourceKind::Courses,
        ResourceKind::Departments,
        ResourceKind::Categories,
        ResourceKind::Groups,
        ResourceKind::Lessons,
        ResourceKind::Units,
    ];

    /// URL segment under `/dashboard/`.
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Books => "books",
            ResourceKind::Courses => "courses",
            ResourceKind::Departments => "departments",
            ResourceKind::Categories => "categories",
            ResourceKind::Groups => "groups",
            ResourceKind::Lessons => "lessons",
            ResourceKind::Units => "units",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            ResourceKind::Books => "Books",
            ResourceKind::Courses => "Courses",
            ResourceKind::Departments => "Departments",
            ResourceKind::Categories => "Categories",
            ResourceKind::Groups => "Groups",
            ResourceKind::Lessons => "Lessons",
            ResourceKind::Units => "Units",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Books => "book",
            ResourceKind::Courses => "course",
            ResourceKind::Departments => "department",
            ResourceKind::Categories => "category",
            ResourceKind::Groups => "group",
            ResourceKind::Lessons => "lesson",
            ResourceKind::Units => "unit",
        }
    }

    /// Endpoint returning every record, when the backend has one.
    ///
    /// Groups are only listed per course, see [`course_groups_endpoint`].
    pub fn list_endpoint(self) -> Option<&'static str> {
        match self {
            ResourceKind::Books => Some("/books"),
            ResourceKind::Courses => Some("/courses/all"),
            ResourceKind::Departments => Some("/Departments/all"),
            ResourceKind::Categories => Some("/Categories"),
            ResourceKind::Groups | ResourceKind::Lessons | ResourceKind::Units => None,
        }
    }

    pub fn detail_endpoint(self, id: &str) -> Option<String> {
        match self {
            ResourceKind::Books => Some(format!("/books/{id}")),
            ResourceKind::Courses => Some(format!("/courses/{id}/full-details")),
            ResourceKind::Departments => Some(format!("/Departments/{id}")),
            ResourceKind::Groups => Some(format!("/courses/groups/{id}/details")),
            ResourceKind::Lessons => Some(format!("/lessons/{id}")),
            ResourceKind::Units => Some(format!("/units/{id}")),
            ResourceKind::Categories => None,
        }
    }

    /// Groups are deleted through a fixed path with the id in the body.
    pub fn delete_request(self, id: &str) -> Option<DeleteRequest> {
        let path = match self {
            ResourceKind::Books => format!("/Books/{id}"),
            ResourceKind::Courses => format!("/courses/{id}"),
            ResourceKind::Departments => format!("/Departments/{id}"),
            ResourceKind::Categories => format!("/Categories/{id}"),
            ResourceKind::Units => format!("/units/{id}"),
            ResourceKind::Groups => {
                return Some(DeleteRequest {
                    path: "/courses/groups/delete".to_owned(),
                    body: Some(json!({ "groupId": id_value(id) })),
                });
            }
            ResourceKind::Lessons => return None,
        };
        Some(DeleteRequest { path, body: None })
    }

    /// POST target for new records. Books are created with a multipart
    /// upload and have none here.
    pub fn create_endpoint(self) -> Option<&'static str> {
        match self {
            ResourceKind::Categories => Some("/Categories"),
            ResourceKind::Departments => Some("/Departments"),
            ResourceKind::Units => Some("/units"),
            ResourceKind::Courses => Some("/courses/add"),
            ResourceKind::Books | ResourceKind::Groups | ResourceKind::Lessons => None,
        }
    }

    pub fn update_endpoint(self, id: &str) -> Option<String> {
        match self {
            ResourceKind::Categories => Some(format!("/Categories/{id}")),
            ResourceKind::Departments => Some(format!("/Departments/{id}")),
            ResourceKind::Units => Some(format!("/units/{id}")),
            ResourceKind::Courses => Some(format!("/courses/{id}/edit")),
            ResourceKind::Groups => Some(format!("/courses/groups/{id}")),
            ResourceKind::Books | ResourceKind::Lessons => None,
        }
    }

    pub fn is_listable(self) -> bool {
        self.list_endpoint().is_some()
    }

    pub fn is_deletable(self) -> bool {
        self.delete_request("").is_some()
    }

    pub fn is_creatable(self) -> bool {
        self.create_endpoint().is_some()
    }

    pub fn is_editable(self) -> bool {
        self.update_endpoint("").is_some()
    }

    pub fn has_translations(self) -> bool {
        !matches!(self, ResourceKind::Categories | ResourceKind::Lessons)
    }

    /// Adds or edits the `language` translation of `record`.
    ///
    /// Edits when the record already carries a named translation for that
    /// language, adds otherwise. `None` when the kind has no translations or
    /// the record has no id.
    pub fn translation_request(self, record: &ResourceRecord, input: &TranslationInput) -> Option<WriteRequest> {
        let owner = record.id_string()?;
        let owner_id = id_value(&owner);
        let existing = find_translation(record, &input.language);
        let existing_id = existing.and_then(|t| t.get("id")).cloned();
        let existing_path = existing_id.as_ref().and_then(id_text);
        let TranslationInput {
            language,
            name,
            description,
        } = input;

        let (method, path, body) = match (self, existing_id, existing_path) {
            (ResourceKind::Books, Some(id), Some(path_id)) => (
                Method::Put,
                format!("/Books/update-translation/{path_id}"),
                json!({ "id": id, "language": language, "name": name, "description": description }),
            ),
            (ResourceKind::Books, ..) => (
                Method::Post,
                "/Books/add-translation".to_owned(),
                json!({ "bookId": owner_id, "language": language, "name": name, "description": description }),
            ),
            (ResourceKind::Departments, Some(id), Some(path_id)) => (
                Method::Put,
                format!("/Departments/translations/{path_id}"),
                json!({ "id": id, "language": language, "name": name }),
            ),
            (ResourceKind::Departments, ..) => (
                Method::Post,
                "/Departments/translations".to_owned(),
                json!({ "departmentId": owner_id, "language": language, "name": name }),
            ),
            (ResourceKind::Groups, Some(id), Some(path_id)) => (
                Method::Put,
                format!("/courses/groups/translations/{path_id}"),
                json!({
                    "id": id,
                    "groupId": owner_id,
                    "language": language,
                    "name": name,
                    "description": description,
                }),
            ),
            (ResourceKind::Groups, ..) => (
                Method::Post,
                "/courses/groups/translations".to_owned(),
                json!({ "groupId": owner_id, "language": language, "name": name, "description": description }),
            ),
            (ResourceKind::Courses, Some(id), _) => (
                Method::Put,
                "/courses/translations/edit".to_owned(),
                json!({
                    "translationId": id,
                    "courseId": owner_id,
                    "language": language,
                    "name": name,
                    "description": description,
                }),
            ),
            (ResourceKind::Courses, ..) => (
                Method::Post,
                "/courses/translations/add".to_owned(),
                json!({ "courseId": owner_id, "language": language, "name": name, "description": description }),
            ),
            (ResourceKind::Units, ..) if existing.is_some() => (
                Method::Put,
                format!("/units/{owner}/translations/{language}"),
                json!({ "name": name }),
            ),
            (ResourceKind::Units, ..) => (
                Method::Post,
                format!("/units/{owner}/translations"),
                json!({ "language": language, "name": name }),
            ),
            (ResourceKind::Categories | ResourceKind::Lessons, ..) => return None,
        };
        Some(WriteRequest { method, path, body })
    }
}

/// Path and optional JSON body of a delete call.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteRequest {
    pub path: String,
    pub body: Option<Value>,
}

/// A POST or PUT with its JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteRequest {
    pub method: Method,
    pub path: String,
    pub body: Value,
}

impl WriteRequest {
    pub fn is_edit(&self) -> bool {
        self.method == Method::Put
    }
}

/// Validated translation form input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationInput {
    pub language: String,
    pub name: String,
    pub description: Option<String>,
}

impl TranslationInput {
    /// Trims every field; language and name are required, an empty
    /// description is dropped.
    ///
    /// # Errors
    ///
    /// Returns the message to show when language or name is missing.
    pub fn new(language: &str, name: &str, description: &str) -> Result<Self, &'static str> {
        let language = language.trim();
        let name = name.trim();
        if language.is_empty() || name.is_empty() {
            return Err("Enter a language and a name.");
        }
        let description = description.trim();
        Ok(Self {
            language: language.to_owned(),
            name: name.to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
        })
    }
}

/// Numeric ids go out as numbers, anything else as a string.
fn id_value(id: &str) -> Value {
    id.parse::<i64>()
        .map_or_else(|_| Value::String(id.to_owned()), Value::from)
}

/// The record's translation for `language`, when it has a non-empty name.
///
/// Translations arrive either keyed by language or as a list of entries
/// carrying a `language` field.
fn find_translation<'a>(record: &'a ResourceRecord, language: &str) -> Option<&'a Map<String, Value>> {
    let entry = match record.extra.get("translations")? {
        Value::Object(by_language) => by_language.get(language)?,
        Value::Array(entries) => entries
            .iter()
            .find(|entry| entry.get("language").and_then(Value::as_str) == Some(language))?,
        _ => return None,
    };
    let entry = entry.as_object()?;
    let named = entry
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty());
    named.then_some(entry)
}

pub fn course_groups_endpoint(course_id: &str) -> String {
    format!("/courses/courses/{course_id}/groups")
}

/// List + selection state for one resource kind.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceState {
    pub kind: ResourceKind,
    pub items: Vec<ResourceRecord>,
    pub selected: Option<ResourceRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ResourceState {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
        }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Marks a request as started and clears the previous error.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Like [`ResourceState::begin`], but also drops the current selection.
    pub fn begin_detail(&mut self) {
        self.begin();
        self.selected = None;
    }

    pub fn finish_list(&mut self, result: Result<Vec<ResourceRecord>, ApiError>) {
        self.loading = false;
        match result {
            Ok(items) => self.items = items,
            Err(err) => {
                self.error = Some(message_or(&err, format!("Failed to fetch {}", self.kind.slug())));
            }
        }
    }

    pub fn finish_detail(&mut self, result: Result<ResourceRecord, ApiError>) {
        self.loading = false;
        match result {
            Ok(record) => self.selected = Some(record),
            Err(err) => {
                self.error = Some(message_or(&err, format!("Failed to fetch {}", self.kind.singular())));
            }
        }
    }

    /// Applies a delete result; on success the record leaves the list and the
    /// selection if it was selected.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when the delete failed.
    pub fn finish_delete(&mut self, id: &str, result: Result<(), ApiError>) -> Result<(), String> {
        self.loading = false;
        match result {
            Ok(()) => {
                self.items
                    .retain(|item| item.id_string().as_deref() != Some(id));
                if self
                    .selected
                    .as_ref()
                    .is_some_and(|selected| selected.id_string().as_deref() == Some(id))
                {
                    self.selected = None;
                }
                Ok(())
            }
            Err(err) => Err(self.fail(&err, format!("Failed to delete {}", self.kind.singular()))),
        }
    }

    /// Applies a create result; a returned record joins the list.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when the create failed.
    pub fn finish_create(&mut self, result: Result<Option<ResourceRecord>, ApiError>) -> Result<(), String> {
        self.loading = false;
        match result {
            Ok(created) => {
                self.items.extend(created);
                Ok(())
            }
            Err(err) => Err(self.fail(&err, format!("Failed to add {}", self.kind.singular()))),
        }
    }

    /// Applies an update result; a returned record replaces the list entry
    /// and the selection with the same id.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when the update failed.
    pub fn finish_update(&mut self, id: &str, result: Result<Option<ResourceRecord>, ApiError>) -> Result<(), String> {
        self.loading = false;
        match result {
            Ok(Some(updated)) => {
                for item in &mut self.items {
                    if item.id_string().as_deref() == Some(id) {
                        *item = updated.clone();
                    }
                }
                if self
                    .selected
                    .as_ref()
                    .is_some_and(|selected| selected.id_string().as_deref() == Some(id))
                {
                    self.selected = Some(updated);
                }
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => Err(self.fail(&err, format!("Failed to update {}", self.kind.singular()))),
        }
    }

    /// # Errors
    ///
    /// Returns the user-facing message when the translation was rejected.
    pub fn finish_translation(&mut self, edit: bool, result: Result<(), ApiError>) -> Result<(), String> {
        self.loading = false;
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                let fallback = if edit {
                    "Failed to update translation"
                } else {
                    "Failed to add translation"
                };
                Err(self.fail(&err, fallback.to_owned()))
            }
        }
    }

    fn fail(&mut self, err: &ApiError, fallback: String) -> String {
        let message = message_or(err, fallback);
        self.error = Some(message.clone());
        message
    }
}

/// The server's message when it sent one, else `fallback`.
fn message_or(err: &ApiError, fallback: String) -> String {
    match err {
        ApiError::Unsupported(message) => message.clone(),
        _ => err.server_message().map_or(fallback, str::to_owned),
    }
}
