//! Upstream (solver) communication.
//!
//! # Data Flow
//! ```text
//! Dispatcher
//!     → health::probe (unauthenticated GET to the health URL)
//!     → forwarder.rs (authenticated body-bearing GET to the solver)
//!     → ForwardOutcome mapped to the client response
//! ```
//!
//! # Design Decisions
//! - One shared pooled HTTP/1 client for probes and forwards
//! - Plain HTTP only; TLS is left to the surrounding infrastructure

pub mod forwarder;

use axum::body::Body;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

pub use forwarder::{ForwardOutcome, Forwarder, HttpForwarder};

/// HTTP client used to reach solver backends.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the shared upstream client.
pub fn build_client() -> UpstreamClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}
