//! Per-request health probing.
//!
//! # Responsibilities
//! - Issue one unauthenticated GET to a backend's health URL
//! - Classify the outcome as Healthy (status 200) or Unhealthy (anything else)

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;

use crate::resilience::timeouts::with_deadline;
use crate::upstream::UpstreamClient;

/// Classification of a single health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Healthy,
    Unhealthy,
}

impl ProbeResult {
    pub fn is_healthy(self) -> bool {
        self == ProbeResult::Healthy
    }
}

/// Checks whether a backend is able to take a request right now.
#[async_trait]
pub trait HealthProber: Send + Sync {
    async fn probe(&self, health_url: &str) -> ProbeResult;
}

/// Probes backends over HTTP.
pub struct HttpHealthProber {
    client: UpstreamClient,
    deadline: Option<Duration>,
}

impl HttpHealthProber {
    /// `deadline` of `None` waits for the transport default.
    pub fn new(client: UpstreamClient, deadline: Option<Duration>) -> Self {
        Self { client, deadline }
    }
}

#[async_trait]
impl HealthProber for HttpHealthProber {
    async fn probe(&self, health_url: &str) -> ProbeResult {
        tracing::debug!(health_url = %health_url, "Making solver health test");

        let request = match Request::get(health_url).body(Body::empty()) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(health_url = %health_url, error = %e, "Health test failed: invalid request");
                return ProbeResult::Unhealthy;
            }
        };

        match with_deadline(self.deadline, self.client.request(request)).await {
            Ok(Ok(response)) if response.status() == StatusCode::OK => {
                tracing::debug!(health_url = %health_url, status = %response.status(), "Health test passed");
                ProbeResult::Healthy
            }
            Ok(Ok(response)) => {
                tracing::warn!(health_url = %health_url, status = %response.status(), "Health test failed: non-200 status");
                ProbeResult::Unhealthy
            }
            Ok(Err(e)) => {
                tracing::warn!(health_url = %health_url, error = %e, "Health test failed: connection error");
                ProbeResult::Unhealthy
            }
            Err(e) => {
                tracing::warn!(health_url = %health_url, error = %e, "Health test failed: timeout");
                ProbeResult::Unhealthy
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{closed_addr, spawn_backend, Reply};
    use crate::upstream::build_client;

    fn prober(deadline: Option<Duration>) -> HttpHealthProber {
        HttpHealthProber::new(build_client(), deadline)
    }

    #[tokio::test]
    async fn healthy_on_200() {
        let backend = spawn_backend(Reply::ok("")).await;
        let result = prober(None).probe(&backend.url("/health_test")).await;
        assert_eq!(result, ProbeResult::Healthy);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/health_test");
        assert!(requests[0].header("authorization").is_none());
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn unhealthy_on_other_status() {
        // 204 is a success, but only 200 counts as healthy.
        let backend = spawn_backend(Reply::status(204, "No Content")).await;
        assert_eq!(prober(None).probe(&backend.url("/health_test")).await, ProbeResult::Unhealthy);

        let backend = spawn_backend(Reply::status(503, "Service Unavailable")).await;
        assert_eq!(prober(None).probe(&backend.url("/health_test")).await, ProbeResult::Unhealthy);
    }

    #[tokio::test]
    async fn unhealthy_when_unreachable() {
        let addr = closed_addr().await;
        let result = prober(None).probe(&format!("http://{}/health_test", addr)).await;
        assert_eq!(result, ProbeResult::Unhealthy);
    }

    #[tokio::test]
    async fn unhealthy_when_deadline_elapses() {
        let backend = spawn_backend(Reply::Hang).await;
        let result = prober(Some(Duration::from_millis(200)))
            .probe(&backend.url("/health_test"))
            .await;
        assert_eq!(result, ProbeResult::Unhealthy);
    }

    #[tokio::test]
    async fn unhealthy_on_malformed_url() {
        assert_eq!(prober(None).probe("not a url").await, ProbeResult::Unhealthy);
    }
}
