//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Close notification → Forced destroy → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, notify, destroy
//! - Shutdown has timeout: exit code 1 after the grace deadline

pub mod shutdown;
pub mod signals;

pub use shutdown::{GracefulShutdown, Shutdown, ShutdownOutcome};
pub use signals::termination_signal;
