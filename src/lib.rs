//! Solver Gateway Library
//!
//! Health-gated forwarding of sudoku solve requests to backend solver
//! services, with connection tracking and a bounded graceful shutdown.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod upstream;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use config::schema::{BackendDescriptor, GatewayConfig, SolverRoute};
pub use error::GatewayError;
pub use http::{Dispatcher, GatewayServer};
pub use lifecycle::{Shutdown, ShutdownOutcome};
