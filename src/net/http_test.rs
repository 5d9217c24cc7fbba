use super::*;

fn response(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        body: body.to_owned(),
    }
}

#[test]
fn build_url_joins_base_and_path() {
    assert_eq!(
        build_url("https://localhost:44332/api/", "/users/verify"),
        "https://localhost:44332/api/users/verify"
    );
    assert_eq!(build_url("https://h/api", "books"), "https://h/api/books");
}

#[test]
fn build_url_with_empty_base_keeps_relative_path() {
    assert_eq!(build_url("  ", "/users/login"), "/users/login");
}

#[test]
fn error_message_prefers_json_message_field() {
    assert_eq!(
        error_message(r#"{"message":"Invalid email or password"}"#),
        "Invalid email or password"
    );
}

#[test]
fn error_message_falls_back_to_trimmed_text() {
    assert_eq!(error_message("  Unauthorized \n"), "Unauthorized");
    assert_eq!(error_message(r#"{"title":"no message"}"#), r#"{"title":"no message"}"#);
}

#[test]
fn error_message_for_empty_body_is_generic() {
    assert_eq!(error_message(""), "Request failed.");
    assert_eq!(error_message(r#"{"message":"   "}"#), "Request failed.");
}

#[test]
fn error_message_truncates_long_bodies() {
    let body = "x".repeat(500);
    assert_eq!(error_message(&body).chars().count(), MAX_ERROR_CHARS);
}

#[test]
fn raw_response_success_range() {
    assert!(response(200, "").is_success());
    assert!(response(204, "").is_success());
    assert!(!response(302, "").is_success());
    assert!(!response(401, "").is_success());
}

#[test]
fn raw_response_into_error_carries_status_and_message() {
    let err = response(400, r#"{"message":"bad"}"#).into_error();
    assert_eq!(
        err,
        ApiError::Http {
            status: 400,
            message: "bad".to_owned()
        }
    );
    assert_eq!(err.server_message(), Some("bad"));
}

#[test]
fn raw_response_json_reports_parse_errors() {
    let ok: serde_json::Value = response(200, r#"{"id":1}"#).json().expect("json");
    assert_eq!(ok["id"], 1);

    let err = response(200, "not json").json::<serde_json::Value>().unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[test]
fn json_if_present_tolerates_empty_and_text_bodies() {
    let decoded: Option<serde_json::Value> = response(201, r#"{"id":4}"#).json_if_present();
    assert_eq!(decoded, Some(serde_json::json!({"id": 4})));
    assert_eq!(response(204, "  ").json_if_present::<serde_json::Value>(), None);
    assert_eq!(response(200, "Updated").json_if_present::<serde_json::Value>(), None);
}

#[test]
fn json_body_encodes_values() {
    let body = json_body(&serde_json::json!({"email":"a@b.org"})).expect("body");
    assert_eq!(body, r#"{"email":"a@b.org"}"#);
}

#[cfg(not(feature = "csr"))]
#[test]
fn requests_are_unavailable_without_browser() {
    use futures::executor::block_on;

    let client = ApiClient::new("https://localhost:44332/api");
    assert_eq!(
        block_on(client.send(Method::Get, "/users/verify", None)),
        Err(ApiError::Unavailable)
    );
    assert_eq!(
        block_on(client.delete("/Books/1", None)),
        Err(ApiError::Unavailable)
    );
    assert_eq!(
        block_on(client.write_json::<serde_json::Value>(Method::Put, "/units/1", "{}".to_owned())),
        Err(ApiError::Unavailable)
    );
}
