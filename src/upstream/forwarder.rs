//! Request forwarding to solver backends.
//!
//! # Responsibilities
//! - Relay the client's JSON body to the solver with the route credential
//! - Map whatever comes back (or does not) to a `ForwardOutcome`
//!
//! # Design Decisions
//! - The request is a GET carrying a body; solvers expect exactly that
//! - Transport failures and deadline expiry are indistinguishable to the client

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use std::time::Duration;

use crate::config::schema::BackendDescriptor;
use crate::error::TRANSPORT_FAILURE_MESSAGE;
use crate::http::response::status_text_of;
use crate::resilience::timeouts::with_deadline;
use crate::upstream::UpstreamClient;

/// Largest solver response body relayed to a client.
pub const MAX_SOLVER_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Result of one forwarded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// The solver answered 200.
    Success { status: StatusCode, body: Bytes },
    /// The solver answered with another status; `reason` is its lowercased status text.
    BackendError { status: StatusCode, reason: String },
    /// No usable response was received.
    TransportFailure { status: StatusCode, reason: String },
}

impl ForwardOutcome {
    pub fn transport_failure() -> Self {
        ForwardOutcome::TransportFailure {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            reason: TRANSPORT_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ForwardOutcome::Success { status, .. }
            | ForwardOutcome::BackendError { status, .. }
            | ForwardOutcome::TransportFailure { status, .. } => *status,
        }
    }
}

/// Sends a validated request to the backend of its route.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, descriptor: &BackendDescriptor, body: Bytes) -> ForwardOutcome;
}

/// Forwards requests over HTTP.
pub struct HttpForwarder {
    client: UpstreamClient,
    deadline: Option<Duration>,
}

impl HttpForwarder {
    /// `deadline` of `None` waits for the transport default.
    pub fn new(client: UpstreamClient, deadline: Option<Duration>) -> Self {
        Self { client, deadline }
    }

    fn build_request(descriptor: &BackendDescriptor, body: Bytes) -> Result<Request<Body>, axum::http::Error> {
        Request::get(descriptor.forward_url.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, descriptor.credential.as_str())
            .body(Body::from(body))
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, descriptor: &BackendDescriptor, body: Bytes) -> ForwardOutcome {
        let forward_url = descriptor.forward_url.as_str();
        tracing::debug!(route = %descriptor.route, forward_url = %forward_url, "Making request to solver");

        let request = match Self::build_request(descriptor, body) {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(forward_url = %forward_url, error = %e, "There was an error while building the solver request");
                return ForwardOutcome::transport_failure();
            }
        };

        let response = match with_deadline(self.deadline, self.client.request(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(forward_url = %forward_url, error = %e, "There was an error while requesting the solver");
                return ForwardOutcome::transport_failure();
            }
            Err(e) => {
                tracing::error!(forward_url = %forward_url, error = %e, "Solver request timed out");
                return ForwardOutcome::transport_failure();
            }
        };

        let status = response.status();
        tracing::debug!(forward_url = %forward_url, status = %status, "Received response from solver");

        if status != StatusCode::OK {
            return ForwardOutcome::BackendError {
                status,
                reason: status_text_of(&response).to_lowercase(),
            };
        }

        let body = Body::new(response.into_body());
        match with_deadline(self.deadline, axum::body::to_bytes(body, MAX_SOLVER_RESPONSE_BYTES)).await {
            Ok(Ok(body)) => ForwardOutcome::Success { status, body },
            Ok(Err(e)) => {
                tracing::error!(forward_url = %forward_url, error = %e, "Failed to read solver response body");
                ForwardOutcome::transport_failure()
            }
            Err(e) => {
                tracing::error!(forward_url = %forward_url, error = %e, "Solver response body timed out");
                ForwardOutcome::transport_failure()
            }
        }
    }
}
