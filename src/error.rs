//! Request error taxonomy.
//!
//! Every error ends the request it belongs to with exactly one response.
//! Clients only ever see a status code and a short status text; details
//! stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::config::schema::SolverRoute;
use crate::http::response::status_only;

/// Status text sent when the health probe fails.
pub const BACKEND_UNAVAILABLE_MESSAGE: &str =
    "the requested solver is not currently working, please use other solver or request it later";

/// Status text sent when the solver could not be reached at all.
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "request to solver failed, please use other solver or request it later";

/// Status text sent for any unexpected failure.
pub const INTERNAL_FAULT_MESSAGE: &str = "internal server error";

/// Which part of the client request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPart {
    Header,
    Body,
}

impl fmt::Display for RequestPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestPart::Header => f.write_str("header"),
            RequestPart::Body => f.write_str("body"),
        }
    }
}

/// Terminal failure of a single gateway request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The client sent an invalid header or body.
    #[error("request {part} validation failed: {message}")]
    Validation { part: RequestPart, message: String },

    /// The health probe did not report the backend as healthy.
    #[error("solver for route {route} failed its health probe")]
    BackendUnavailable { route: SolverRoute },

    /// The backend answered with a non-200 status.
    #[error("solver answered {status}: {reason}")]
    BackendRejected { status: StatusCode, reason: String },

    /// No response was received from the backend.
    #[error("{}", TRANSPORT_FAILURE_MESSAGE)]
    TransportFailure,

    /// Anything unexpected. The detail is logged, never sent.
    #[error("internal fault: {0}")]
    InternalFault(String),
}

impl GatewayError {
    /// Status code sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation { .. } => StatusCode::BAD_REQUEST,
            GatewayError::BackendRejected { status, .. } => *status,
            GatewayError::BackendUnavailable { .. }
            | GatewayError::TransportFailure
            | GatewayError::InternalFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Status text sent to the client as the reason phrase.
    pub fn status_text(&self) -> String {
        match self {
            GatewayError::Validation { message, .. } => message.to_lowercase(),
            GatewayError::BackendUnavailable { .. } => BACKEND_UNAVAILABLE_MESSAGE.to_string(),
            GatewayError::BackendRejected { reason, .. } => reason.clone(),
            GatewayError::TransportFailure => TRANSPORT_FAILURE_MESSAGE.to_string(),
            GatewayError::InternalFault(_) => INTERNAL_FAULT_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        status_only(self.status(), &self.status_text())
    }
}
