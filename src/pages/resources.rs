//! List/detail page for one content section (`/dashboard/:resource`).
//!
//! SYSTEM CONTEXT
//! ==============
//! The `:resource` segment picks a [`ResourceKind`]; unknown slugs render the
//! not-found page. Groups are listed per course through `?course=<id>`.
//! Creates and edits take a raw JSON object; the selected record carries a
//! translation form when its kind has translations.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_params_map, use_query_map};
use serde_json::Value;

use crate::components::admin_layout::AdminLayout;
use crate::components::snackbar_host::notify;
use crate::config::AppConfig;
use crate::net::api;
use crate::net::http::ApiClient;
use crate::net::types::ResourceRecord;
use crate::pages::not_found::NotFoundPage;
use crate::state::resources::{ResourceKind, ResourceState, TranslationInput};
use crate::state::snackbar::{SnackbarKind, SnackbarState};
use crate::util::uploads::upload_url;

/// Record fields that hold a path under the backend uploads directory.
const UPLOAD_FIELDS: &[&str] = &["picture", "imageUrl", "coverImage", "filePath"];

/// Where a list page gets its records from.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ListSource {
    All,
    CourseGroups(String),
    /// No list endpoint; records are reached from their parent.
    Unlisted,
}

fn list_source(kind: ResourceKind, course: Option<&str>) -> ListSource {
    match (kind, course.filter(|id| !id.is_empty())) {
        (ResourceKind::Groups, Some(course_id)) => ListSource::CourseGroups(course_id.to_owned()),
        _ if kind.is_listable() => ListSource::All,
        _ => ListSource::Unlisted,
    }
}

/// Parses editor text into the JSON object sent as a create/update body.
fn parse_payload(text: &str) -> Result<Value, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Enter a JSON object.".to_owned());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("The body must be a JSON object.".to_owned()),
        Err(err) => Err(format!("Invalid JSON: {err}")),
    }
}

/// Editor text for a record: its fields minus the id.
fn edit_template(record: &ResourceRecord) -> String {
    let mut value = serde_json::to_value(record).unwrap_or_default();
    if let Value::Object(fields) = &mut value {
        fields.remove("id");
    }
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// Open JSON editor: `None` id creates, `Some` edits.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Draft {
    id: Option<String>,
}

#[component]
pub fn ResourcesPage() -> impl IntoView {
    let params = use_params_map();
    let query = use_query_map();
    let kind = Memo::new(move |_| {
        params.with(|p| p.get("resource").and_then(|slug| ResourceKind::from_slug(&slug)))
    });
    let course = Memo::new(move |_| query.with(|q| q.get("course")));

    view! {
        {move || match kind.get() {
            Some(kind) => {
                view! {
                    <AdminLayout>
                        <ResourceList kind=kind course=course.get()/>
                    </AdminLayout>
                }
                    .into_any()
            }
            None => view! { <NotFoundPage/> }.into_any(),
        }}
    }
}

#[component]
fn ResourceList(kind: ResourceKind, course: Option<String>) -> impl IntoView {
    let snackbar = expect_context::<RwSignal<SnackbarState>>();
    let client = expect_context::<ApiClient>();
    let api_base_url = expect_context::<AppConfig>().api_base_url;
    let state = RwSignal::new(ResourceState::new(kind));
    let source = StoredValue::new(list_source(kind, course.as_deref()));
    let client = StoredValue::new(client);
    let draft = RwSignal::new(None::<Draft>);
    let draft_text = RwSignal::new(String::new());

    let load = move || {
        let source = source.get_value();
        if source == ListSource::Unlisted {
            return;
        }
        state.update(ResourceState::begin);
        let client = client.get_value();
        spawn_local(async move {
            let result = match source {
                ListSource::CourseGroups(course_id) => api::fetch_course_groups(&client, &course_id).await,
                _ => api::fetch_resources(&client, kind).await,
            };
            let _ = state.try_update(|s| s.finish_list(result));
        });
    };
    load();

    let select = move |record: ResourceRecord| {
        let Some(id) = record.id_string() else {
            state.update(|s| s.selected = Some(record));
            return;
        };
        if kind.detail_endpoint(&id).is_none() {
            state.update(|s| s.selected = Some(record));
            return;
        }
        state.update(ResourceState::begin_detail);
        let client = client.get_value();
        spawn_local(async move {
            let result = api::fetch_resource(&client, kind, &id).await;
            let _ = state.try_update(|s| s.finish_detail(result));
        });
    };

    let remove = move |id: String| {
        state.update(ResourceState::begin);
        let client = client.get_value();
        spawn_local(async move {
            let result = api::delete_resource(&client, kind, &id).await;
            match state.try_update(|s| s.finish_delete(&id, result)) {
                Some(Ok(())) => notify(snackbar, format!("Deleted from {}", kind.title()), SnackbarKind::Success),
                Some(Err(message)) => notify(snackbar, message, SnackbarKind::Error),
                None => {}
            }
        });
    };

    let open_create = move |_| {
        draft_text.set("{\n}".to_owned());
        draft.set(Some(Draft { id: None }));
    };

    let on_edit = Callback::new(move |record: ResourceRecord| {
        draft_text.set(edit_template(&record));
        draft.set(Some(Draft { id: record.id_string() }));
    });

    let on_cancel = Callback::new(move |()| draft.set(None));

    let on_save = Callback::new(move |()| {
        let Some(Draft { id }) = draft.get_untracked() else {
            return;
        };
        let payload = match parse_payload(&draft_text.get_untracked()) {
            Ok(payload) => payload,
            Err(message) => {
                notify(snackbar, message, SnackbarKind::Warning);
                return;
            }
        };
        state.update(ResourceState::begin);
        let client = client.get_value();
        spawn_local(async move {
            let outcome = match id {
                Some(id) => {
                    let result = api::update_resource(&client, kind, &id, &payload).await;
                    state.try_update(|s| s.finish_update(&id, result))
                }
                None => {
                    let result = api::create_resource(&client, kind, &payload).await;
                    state.try_update(|s| s.finish_create(result))
                }
            };
            match outcome {
                Some(Ok(())) => {
                    let _ = draft.try_set(None);
                    notify(snackbar, format!("Saved {}", kind.singular()), SnackbarKind::Success);
                }
                Some(Err(message)) => notify(snackbar, message, SnackbarKind::Error),
                None => {}
            }
        });
    });

    let on_translate = Callback::new(move |(record, input): (ResourceRecord, TranslationInput)| {
        state.update(ResourceState::begin);
        let edit = kind
            .translation_request(&record, &input)
            .is_some_and(|request| request.is_edit());
        let client = client.get_value();
        spawn_local(async move {
            let result = api::submit_translation(&client, kind, &record, &input).await;
            match state.try_update(|s| s.finish_translation(edit, result)) {
                Some(Ok(())) => {
                    notify(snackbar, "Translation saved", SnackbarKind::Success);
                    select(record);
                }
                Some(Err(message)) => notify(snackbar, message, SnackbarKind::Error),
                None => {}
            }
        });
    });

    view! {
        <section class="resource-list">
            <header class="resource-list__header">
                <h1>{kind.title()}</h1>
                <span class="resource-list__count">{move || state.with(ResourceState::total)}</span>
                <button class="btn" on:click=move |_| load() disabled=move || state.with(|s| s.loading)>
                    "Refresh"
                </button>
                {kind
                    .is_creatable()
                    .then(|| view! { <button class="btn btn--primary" on:click=open_create>"New"</button> })}
            </header>
            {(source.get_value() == ListSource::Unlisted)
                .then(|| {
                    view! {
                        <p class="resource-list__hint">
                            {format!("{} are opened from their parent record.", kind.title())}
                        </p>
                    }
                })}
            <Show when=move || state.with(|s| s.loading)>
                <p class="resource-list__loading">"Loading..."</p>
            </Show>
            {move || {
                state
                    .with(|s| s.error.clone())
                    .map(|error| view! { <p class="resource-list__error">{error}</p> })
            }}
            <ul class="resource-list__items">
                <For
                    each=move || state.with(|s| s.items.clone())
                    key=|record| record.id_string().unwrap_or_else(|| record.label())
                    children=move |record: ResourceRecord| {
                        let id = record.id_string();
                        let label = record.label();
                        let groups_href = id
                            .clone()
                            .filter(|_| kind == ResourceKind::Courses)
                            .map(|id| format!("/dashboard/groups?course={id}"));
                        let delete_id = id.filter(|_| kind.is_deletable());
                        view! {
                            <li class="resource-list__item">
                                <button class="resource-list__label" on:click=move |_| select(record.clone())>
                                    {label}
                                </button>
                                {groups_href.map(|href| view! { <a class="btn" href=href>"Groups"</a> })}
                                {delete_id
                                    .map(|id| {
                                        view! {
                                            <button
                                                class="btn btn--danger"
                                                on:click=move |_| remove(id.clone())
                                            >
                                                "Delete"
                                            </button>
                                        }
                                    })}
                            </li>
                        }
                    }
                />
            </ul>
            {move || {
                let api_base_url = api_base_url.clone();
                state
                    .with(|s| s.selected.clone())
                    .map(|record| {
                        view! {
                            <ResourceDetail
                                kind=kind
                                record=record
                                api_base_url=api_base_url
                                on_edit=on_edit
                                on_translate=on_translate
                            />
                        }
                    })
            }}
            <Show when=move || draft.with(Option::is_some)>
                <ResourceEditor
                    title=move || {
                        draft.with(|d| match d {
                            Some(Draft { id: Some(id) }) => format!("Edit {} {id}", kind.singular()),
                            _ => format!("New {}", kind.singular()),
                        })
                    }
                    value=draft_text
                    on_cancel=on_cancel
                    on_save=on_save
                />
            </Show>
        </section>
    }
}

/// Field dump of the selected record, with its upload preview if it has one.
#[component]
fn ResourceDetail(
    kind: ResourceKind,
    record: ResourceRecord,
    api_base_url: String,
    on_edit: Callback<ResourceRecord>,
    on_translate: Callback<(ResourceRecord, TranslationInput)>,
) -> impl IntoView {
    let image = UPLOAD_FIELDS
        .iter()
        .find_map(|field| record.extra.get(*field).and_then(Value::as_str))
        .filter(|route| !route.is_empty())
        .map(|route| upload_url(&api_base_url, route));
    let body = serde_json::to_string_pretty(&record).unwrap_or_default();
    let editable = kind.is_editable() && record.id_string().is_some();
    let translatable = kind.has_translations() && record.id_string().is_some();
    let edit_record = record.clone();
    let translate_record = record.clone();

    view! {
        <aside class="resource-detail">
            <h2>{record.label()}</h2>
            {editable
                .then(|| {
                    view! {
                        <button class="btn" on:click=move |_| on_edit.run(edit_record.clone())>
                            "Edit"
                        </button>
                    }
                })}
            {image.map(|src| view! { <img class="resource-detail__image" src=src alt=""/> })}
            <pre class="resource-detail__body">{body}</pre>
            {translatable
                .then(|| {
                    view! {
                        <TranslationForm on_submit=Callback::new(move |input: TranslationInput| {
                            on_translate.run((translate_record.clone(), input));
                        })/>
                    }
                })}
        </aside>
    }
}

/// Modal JSON editor for create and edit.
#[component]
fn ResourceEditor(
    #[prop(into)] title: Signal<String>,
    value: RwSignal<String>,
    on_cancel: Callback<()>,
    on_save: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog dialog--resource" on:click=move |ev| ev.stop_propagation()>
                <h2 class="dialog__title">{title}</h2>
                <label class="dialog__label">
                    "JSON"
                    <textarea
                        class="dialog__textarea"
                        prop:value=move || value.get()
                        on:input=move |ev| value.set(event_target_value(&ev))
                        autofocus=true
                    ></textarea>
                </label>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" on:click=move |_| on_save.run(())>
                        "Save"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Adds or edits one translation; the backend picks add vs edit per language.
#[component]
fn TranslationForm(on_submit: Callback<TranslationInput>) -> impl IntoView {
    let language = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match TranslationInput::new(
            &language.get_untracked(),
            &name.get_untracked(),
            &description.get_untracked(),
        ) {
            Ok(input) => {
                info.set(String::new());
                on_submit.run(input);
            }
            Err(message) => info.set(message.to_owned()),
        }
    };

    view! {
        <form class="translation-form" on:submit=submit>
            <h3>"Translation"</h3>
            <input
                class="translation-form__language"
                placeholder="Language (ar, en, ...)"
                prop:value=move || language.get()
                on:input=move |ev| language.set(event_target_value(&ev))
            />
            <input
                class="translation-form__name"
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <textarea
                class="translation-form__description"
                placeholder="Description"
                prop:value=move || description.get()
                on:input=move |ev| description.set(event_target_value(&ev))
            ></textarea>
            <button class="btn btn--primary" type="submit">
                "Save translation"
            </button>
            <Show when=move || !info.get().is_empty()>
                <p class="translation-form__message">{move || info.get()}</p>
            </Show>
        </form>
    }
}
