//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts.rs (optional deadline around the probe / forward call)
//!     → On expiry: the call is classified as a failure by its caller
//! ```
//!
//! # Design Decisions
//! - No retries and no circuit breaker: each request gets one probe and one forward
//! - Deadlines are configurable; 0 means the transport default (unbounded)

pub mod timeouts;
