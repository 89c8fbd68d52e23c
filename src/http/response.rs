//! Client response construction.
//!
//! # Responsibilities
//! - Carry the gateway's status text in the HTTP/1.1 reason phrase
//! - Build empty-bodied error responses
//! - Relay a solver's JSON payload on success
//!
//! # Design Decisions
//! - Status text that is not a legal reason phrase falls back to the
//!   canonical reason for the code rather than failing the request

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use hyper::ext::ReasonPhrase;

/// Status text of a successful solve.
pub const OK_STATUS_TEXT: &str = "ok";

/// Response with a status, a status text and no body.
pub fn status_only(status: StatusCode, status_text: &str) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    set_status_text(&mut response, status_text);
    response
}

/// Response relaying a solver's JSON payload.
pub fn json_payload(status: StatusCode, payload: Bytes) -> Response {
    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    set_status_text(&mut response, OK_STATUS_TEXT);
    response
}

/// Attach a custom reason phrase to a response.
pub fn set_status_text(response: &mut Response, status_text: &str) {
    match ReasonPhrase::try_from(status_text.as_bytes()) {
        Ok(reason) => {
            response.extensions_mut().insert(reason);
        }
        Err(_) => {
            tracing::debug!(
                status_text = %status_text,
                "Status text is not a valid reason phrase, using canonical reason"
            );
        }
    }
}

/// Status text of a response: its custom reason phrase if any, else the canonical one.
pub fn status_text_of<B>(response: &axum::http::Response<B>) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(str::to_string))
        .unwrap_or_default()
}
