//! Mandatory request header checks.

use axum::http::{header, HeaderMap};

use super::Verdict;

/// A solve request must declare a JSON payload.
pub fn check_header(headers: &HeaderMap) -> Verdict {
    let content_type = match headers.get(header::CONTENT_TYPE) {
        Some(value) => value,
        None => return Verdict::fail("Content-Type Header Not Found"),
    };

    let content_type = match content_type.to_str() {
        Ok(value) => value,
        Err(_) => return Verdict::fail("Content-Type Header Not Valid"),
    };

    let mime = content_type.split(';').next().unwrap_or_default().trim();
    if !mime.eq_ignore_ascii_case("application/json") {
        return Verdict::fail("Content-Type Header Must Be application/json");
    }

    Verdict::pass()
}
