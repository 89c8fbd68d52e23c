//! Health-gated request dispatch.
//!
//! # Request States
//! ```text
//! Received → HeaderValidated → BodyValidated → HealthChecked → Forwarded → Responded
//!     │             │                               │
//!     └─ 400        └─ 400                          └─ 500 (solver not working)
//! ```
//!
//! Every stage returns `Result<_, GatewayError>`; `dispatch` is the single
//! boundary that turns an error into the client response.

use axum::response::{IntoResponse, Response};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

use crate::config::schema::{BackendDescriptor, SolverRoute};
use crate::error::{GatewayError, RequestPart};
use crate::health::HealthProber;
use crate::http::request::RequestContext;
use crate::http::response::json_payload;
use crate::upstream::{ForwardOutcome, Forwarder};
use crate::validation::Validator;

/// Position of a request in the dispatch state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Received,
    HeaderValidated,
    BodyValidated,
    HealthChecked,
    Forwarded,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchStage::Received => "received",
            DispatchStage::HeaderValidated => "header_validated",
            DispatchStage::BodyValidated => "body_validated",
            DispatchStage::HealthChecked => "health_checked",
            DispatchStage::Forwarded => "forwarded",
        };
        f.write_str(name)
    }
}

/// Immutable route → backend lookup.
pub type RouteTable = BTreeMap<SolverRoute, BackendDescriptor>;

/// Orchestrates validation, health probe and forwarding for one request.
pub struct Dispatcher {
    routes: RouteTable,
    validator: Arc<dyn Validator>,
    prober: Arc<dyn HealthProber>,
    forwarder: Arc<dyn Forwarder>,
}

impl Dispatcher {
    pub fn new(
        descriptors: impl IntoIterator<Item = BackendDescriptor>,
        validator: Arc<dyn Validator>,
        prober: Arc<dyn HealthProber>,
        forwarder: Arc<dyn Forwarder>,
    ) -> Self {
        let routes = descriptors.into_iter().map(|d| (d.route, d)).collect();
        Self {
            routes,
            validator,
            prober,
            forwarder,
        }
    }

    /// Routes with a registered backend.
    pub fn routes(&self) -> impl Iterator<Item = SolverRoute> + '_ {
        self.routes.keys().copied()
    }

    /// Handle one request to completion. Always produces exactly one response.
    pub async fn dispatch(&self, ctx: RequestContext) -> Response {
        let span = tracing::info_span!(
            "dispatch",
            request_id = %ctx.request_id,
            route = %ctx.route,
        );

        async move {
            tracing::info!(origin_url = %ctx.origin_url, "New request received");

            let mut stage = DispatchStage::Received;
            match self.run(&ctx, &mut stage).await {
                Ok(response) => {
                    tracing::info!(status = %response.status(), "Request answered");
                    response
                }
                Err(error) => {
                    match &error {
                        GatewayError::InternalFault(detail) => {
                            tracing::error!(stage = %stage, error = %detail, "Internal fault while handling request");
                        }
                        GatewayError::Validation { .. } => {
                            tracing::info!(stage = %stage, error = %error, "Request rejected");
                        }
                        _ => {
                            tracing::warn!(stage = %stage, error = %error, "Request failed");
                        }
                    }
                    error.into_response()
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, ctx: &RequestContext, stage: &mut DispatchStage) -> Result<Response, GatewayError> {
        self.validate_header(ctx)?;
        *stage = DispatchStage::HeaderValidated;

        self.validate_body(ctx)?;
        *stage = DispatchStage::BodyValidated;

        let descriptor = self.resolve(ctx.route)?;
        let probe = self.prober.probe(&descriptor.health_url).await;
        *stage = DispatchStage::HealthChecked;
        if !probe.is_healthy() {
            return Err(GatewayError::BackendUnavailable {
                route: descriptor.route,
            });
        }

        let outcome = self.forwarder.forward(descriptor, ctx.body.clone()).await;
        *stage = DispatchStage::Forwarded;

        tracing::info!(
            forward_url = %descriptor.forward_url,
            origin_url = %ctx.origin_url,
            status = %outcome.status(),
            "Routing solver response to client"
        );
        respond(outcome)
    }

    fn validate_header(&self, ctx: &RequestContext) -> Result<(), GatewayError> {
        let verdict = self.validator.check_header(&ctx.headers);
        tracing::debug!(valid = verdict.valid, "Request header validation status");
        if verdict.valid {
            Ok(())
        } else {
            Err(GatewayError::Validation {
                part: RequestPart::Header,
                message: verdict.message,
            })
        }
    }

    fn validate_body(&self, ctx: &RequestContext) -> Result<(), GatewayError> {
        let verdict = self.validator.check_body(&ctx.body);
        tracing::debug!(valid = verdict.valid, "Request body validation status");
        if verdict.valid {
            Ok(())
        } else {
            Err(GatewayError::Validation {
                part: RequestPart::Body,
                message: verdict.message,
            })
        }
    }

    fn resolve(&self, route: SolverRoute) -> Result<&BackendDescriptor, GatewayError> {
        self.routes
            .get(&route)
            .ok_or_else(|| GatewayError::InternalFault(format!("no backend registered for route {route}")))
    }
}

fn respond(outcome: ForwardOutcome) -> Result<Response, GatewayError> {
    match outcome {
        ForwardOutcome::Success { status, body } => Ok(json_payload(status, body)),
        ForwardOutcome::BackendError { status, reason } => Err(GatewayError::BackendRejected { status, reason }),
        ForwardOutcome::TransportFailure { .. } => Err(GatewayError::TransportFailure),
    }
}
