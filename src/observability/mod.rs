//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Request ID (x-request-id) flows through:
//!     → tower-http request-id layers
//!     → dispatcher span
//! ```

pub mod logging;

pub use logging::init_logging;
