//! Per-request context.
//!
//! # Responsibilities
//! - Capture the route, headers and body of one client request
//! - Carry the request ID assigned by the request-id layer
//!   (`SetRequestIdLayer` in server.rs is the only place IDs are minted)
//! - Compute the origin URL used in routing logs

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Uri};
use crate::config::schema::SolverRoute;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Logged when a request reaches the dispatcher without an ID.
const MISSING_REQUEST_ID: &str = "-";

/// Everything the dispatcher needs about one client request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub route: SolverRoute,
    pub request_id: String,
    pub origin_url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RequestContext {
    pub fn new(route: SolverRoute, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        let request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| MISSING_REQUEST_ID.to_string());
        let origin_url = origin_url(&headers, uri);

        Self {
            route,
            request_id,
            origin_url,
            headers,
            body,
        }
    }
}

/// `http://<host><original uri>` as seen by the client.
pub fn origin_url(headers: &HeaderMap, uri: &Uri) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("unknown");
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("http://{}{}", host, path)
}
