//! URLs for files the backend serves from its uploads directory
//! (book covers, PDFs, unit media).

#[cfg(test)]
#[path = "uploads_test.rs"]
mod uploads_test;

/// Joins `api_base_url` with `/uploads/` and `route` (leading slashes dropped).
pub fn upload_url(api_base_url: &str, route: &str) -> String {
    format!(
        "{}/uploads/{}",
        api_base_url.trim_end_matches('/'),
        route.trim_start_matches('/')
    )
}
