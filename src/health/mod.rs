//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher (per request, after validation)
//!     → probe.rs (single GET to the backend's health URL)
//!     → ProbeResult::Healthy  → forward
//!     → ProbeResult::Unhealthy → 500, solver not currently working
//! ```
//!
//! # Design Decisions
//! - Probe results are never cached; every request probes afresh
//! - No retries: one probe per client request
//! - Probe errors are logged, never shown to the client

pub mod probe;

pub use probe::{HealthProber, HttpHealthProber, ProbeResult};
