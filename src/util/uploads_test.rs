use super::*;

#[test]
fn upload_url_strips_leading_slashes_from_route() {
    assert_eq!(
        upload_url("https://localhost:44332/api", "///books/cover.png"),
        "https://localhost:44332/api/uploads/books/cover.png"
    );
}

#[test]
fn upload_url_tolerates_trailing_slash_on_base() {
    assert_eq!(
        upload_url("https://h/api/", "units/1.pdf"),
        "https://h/api/uploads/units/1.pdf"
    );
}
