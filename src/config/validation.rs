//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every registered route has parseable `http` URLs and a usable credential
//! - Each route is registered at most once
//! - Shutdown timers are ordered (force destroy before the grace deadline)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use axum::http::HeaderValue;
use url::Url;

use crate::config::schema::{GatewayConfig, SolverRoute};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no solver route is configured")]
    NoRoutes,

    #[error("route {0} is configured more than once")]
    DuplicateRoute(SolverRoute),

    #[error("route {route}: {field} is invalid: {reason}")]
    InvalidUrl {
        route: SolverRoute,
        field: &'static str,
        reason: String,
    },

    #[error("route {0}: credential must be a non-empty header value")]
    InvalidCredential(SolverRoute),

    #[error("listener port must not be 0")]
    ZeroPort,

    #[error("shutdown.force_destroy_ms ({force_destroy_ms}) must be lower than shutdown.grace_period_ms ({grace_period_ms})")]
    ShutdownTimers {
        force_destroy_ms: u64,
        grace_period_ms: u64,
    },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut seen = Vec::with_capacity(config.routes.len());
    for descriptor in &config.routes {
        if seen.contains(&descriptor.route) {
            errors.push(ValidationError::DuplicateRoute(descriptor.route));
            continue;
        }
        seen.push(descriptor.route);

        for (field, value) in [
            ("forward_url", &descriptor.forward_url),
            ("health_url", &descriptor.health_url),
        ] {
            if let Err(reason) = check_http_url(value) {
                errors.push(ValidationError::InvalidUrl {
                    route: descriptor.route,
                    field,
                    reason,
                });
            }
        }

        if descriptor.credential.is_empty() || HeaderValue::from_str(&descriptor.credential).is_err() {
            errors.push(ValidationError::InvalidCredential(descriptor.route));
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if config.shutdown.force_destroy_ms >= config.shutdown.grace_period_ms {
        errors.push(ValidationError::ShutdownTimers {
            force_destroy_ms: config.shutdown.force_destroy_ms,
            grace_period_ms: config.shutdown.grace_period_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// The upstream client speaks plain HTTP only.
fn check_http_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
